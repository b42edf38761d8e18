use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use livelum_core::criteria::normalize_text;
use livelum_core::error::{require_company, require_positive_number, require_text};
use livelum_core::{CompanyId, CompanyScoped, DomainError, DomainResult, Entity, Sequenced, bump_timestamp};

livelum_core::entity_id!(SkillId);

/// Skill category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillCategory {
    Technical,
    Soft,
    Management,
    Language,
    Other,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Technical => "TECHNICAL",
            SkillCategory::Soft => "SOFT",
            SkillCategory::Management => "MANAGEMENT",
            SkillCategory::Language => "LANGUAGE",
            SkillCategory::Other => "OTHER",
        }
    }
}

impl core::str::FromStr for SkillCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TECHNICAL" => Ok(SkillCategory::Technical),
            "SOFT" => Ok(SkillCategory::Soft),
            "MANAGEMENT" => Ok(SkillCategory::Management),
            "LANGUAGE" => Ok(SkillCategory::Language),
            "OTHER" => Ok(SkillCategory::Other),
            other => Err(DomainError::validation(format!("Categoría inválida: {other}"))),
        }
    }
}

/// Skill status. Any status may overwrite any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillStatus {
    Active,
    Inactive,
}

impl SkillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillStatus::Active => "ACTIVE",
            SkillStatus::Inactive => "INACTIVE",
        }
    }
}

impl core::str::FromStr for SkillStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(SkillStatus::Active),
            "INACTIVE" => Ok(SkillStatus::Inactive),
            other => Err(DomainError::validation(format!("Estado inválido: {other}"))),
        }
    }
}

/// Plain serializable shape of a skill (what gets stored and returned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub id: SkillId,
    pub number: u32,
    pub title: String,
    pub description: Option<String>,
    pub category: SkillCategory,
    pub status: SkillStatus,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for [`Skill::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSkill {
    pub number: u32,
    pub title: String,
    pub description: Option<String>,
    pub category: SkillCategory,
    pub company_id: CompanyId,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillPatch {
    pub title: Option<String>,
    /// A blank description clears it.
    pub description: Option<String>,
    pub category: Option<SkillCategory>,
}

/// Entity: Skill.
///
/// Invariants (checked on every construction and update): title non-empty,
/// number >= 1, company set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    id: SkillId,
    number: u32,
    title: String,
    description: Option<String>,
    category: SkillCategory,
    status: SkillStatus,
    company_id: CompanyId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Skill {
    /// Build a new active skill with a fresh id.
    pub fn create(new: NewSkill, now: DateTime<Utc>) -> DomainResult<Self> {
        let skill = Self {
            id: SkillId::new(),
            number: new.number,
            title: new.title.trim().to_string(),
            description: normalize_text(new.description),
            category: new.category,
            status: SkillStatus::Active,
            company_id: new.company_id,
            created_at: now,
            updated_at: now,
        };
        skill.validate()?;
        Ok(skill)
    }

    /// Rehydrate a stored record.
    pub fn from_primitives(record: SkillRecord) -> DomainResult<Self> {
        let skill = Self {
            id: record.id,
            number: record.number,
            title: record.title,
            description: record.description,
            category: record.category,
            status: record.status,
            company_id: record.company_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        skill.validate()?;
        Ok(skill)
    }

    pub fn to_primitives(&self) -> SkillRecord {
        SkillRecord {
            id: self.id,
            number: self.number,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            status: self.status,
            company_id: self.company_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Apply a partial update. On error the skill is left unchanged.
    pub fn update(&mut self, patch: SkillPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            next.description = normalize_text(Some(description));
        }
        if let Some(category) = patch.category {
            next.category = category;
        }
        next.validate()?;
        next.updated_at = bump_timestamp(self.updated_at, now);
        *self = next;
        Ok(())
    }

    pub fn activate(&mut self, now: DateTime<Utc>) {
        self.set_status(SkillStatus::Active, now);
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.set_status(SkillStatus::Inactive, now);
    }

    pub fn set_status(&mut self, status: SkillStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = bump_timestamp(self.updated_at, now);
    }

    pub fn id_typed(&self) -> SkillId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn category(&self) -> SkillCategory {
        self.category
    }

    pub fn status(&self) -> SkillStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SkillStatus::Active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn validate(&self) -> DomainResult<()> {
        require_text(&self.title, "El título de la habilidad es requerido")?;
        require_positive_number(self.number, "El número de la habilidad debe ser mayor a 0")?;
        require_company(self.company_id, "La empresa es requerida")?;
        Ok(())
    }
}

impl Entity for Skill {
    type Id = SkillId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl CompanyScoped for Skill {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }
}

impl Sequenced for Skill {
    fn number(&self) -> u32 {
        self.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_skill(title: &str, number: u32) -> NewSkill {
        NewSkill {
            number,
            title: title.to_string(),
            description: None,
            category: SkillCategory::Technical,
            company_id: CompanyId::new(),
        }
    }

    #[test]
    fn create_starts_active() {
        let skill = Skill::create(new_skill("Soldadura", 1), Utc::now()).unwrap();
        let record = skill.to_primitives();
        assert_eq!(record.status, SkillStatus::Active);
        assert_eq!(record.created_at, record.updated_at);
        assert!(skill.is_active());
    }

    #[test]
    fn create_rejects_blank_title() {
        let err = Skill::create(new_skill("   ", 1), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_number_zero() {
        assert!(Skill::create(new_skill("Soldadura", 0), Utc::now()).is_err());
    }

    #[test]
    fn create_rejects_nil_company() {
        let mut new = new_skill("Soldadura", 1);
        new.company_id = CompanyId::from_uuid(uuid::Uuid::nil());
        assert!(Skill::create(new, Utc::now()).is_err());
    }

    #[test]
    fn update_changes_title_and_bumps_updated_at() {
        let now = Utc::now();
        let mut skill = Skill::create(new_skill("Soldadura", 1), now).unwrap();
        let before = skill.updated_at();

        // Same instant: updated_at must still move forward.
        skill
            .update(SkillPatch { title: Some("X".into()), ..Default::default() }, now)
            .unwrap();

        let record = skill.to_primitives();
        assert_eq!(record.title, "X");
        assert!(record.updated_at > before);
    }

    #[test]
    fn failed_update_leaves_skill_unchanged() {
        let mut skill = Skill::create(new_skill("Soldadura", 1), Utc::now()).unwrap();
        let snapshot = skill.clone();

        let err = skill
            .update(
                SkillPatch {
                    title: Some(String::new()),
                    category: Some(SkillCategory::Soft),
                    ..Default::default()
                },
                Utc::now() + Duration::seconds(1),
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(skill, snapshot);
    }

    #[test]
    fn blank_description_clears_it() {
        let mut new = new_skill("Soldadura", 1);
        new.description = Some("MIG/TIG".into());
        let mut skill = Skill::create(new, Utc::now()).unwrap();
        skill
            .update(SkillPatch { description: Some("  ".into()), ..Default::default() }, Utc::now())
            .unwrap();
        assert_eq!(skill.description(), None);
    }

    #[test]
    fn status_can_be_overwritten_freely() {
        let mut skill = Skill::create(new_skill("Soldadura", 1), Utc::now()).unwrap();
        skill.deactivate(Utc::now());
        assert_eq!(skill.status(), SkillStatus::Inactive);
        skill.deactivate(Utc::now());
        assert_eq!(skill.status(), SkillStatus::Inactive);
        skill.activate(Utc::now());
        assert!(skill.is_active());
    }

    #[test]
    fn from_primitives_rejects_invalid_record() {
        let mut record = Skill::create(new_skill("Soldadura", 3), Utc::now())
            .unwrap()
            .to_primitives();
        record.title = String::new();
        assert!(Skill::from_primitives(record).is_err());
    }

    #[test]
    fn wire_format_is_camel_case_with_upper_enums() {
        let record = Skill::create(new_skill("Soldadura", 7), Utc::now())
            .unwrap()
            .to_primitives();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["category"], "TECHNICAL");
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["companyId"], record.company_id.to_string());
        let back: SkillRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: any non-blank title with number >= 1 creates an active skill.
            #[test]
            fn valid_input_always_creates_active_skill(
                title in "[A-Za-z][A-Za-z0-9 ]{0,60}",
                number in 1u32..100_000,
            ) {
                let skill = Skill::create(new_skill(&title, number), Utc::now()).unwrap();
                prop_assert_eq!(skill.to_primitives().status, SkillStatus::Active);
                prop_assert_eq!(skill.number(), number);
            }

            /// Property: whitespace-only titles are always rejected.
            #[test]
            fn blank_title_always_rejected(title in "[ \t]{0,10}", number in 1u32..100) {
                prop_assert!(Skill::create(new_skill(&title, number), Utc::now()).is_err());
            }
        }
    }
}
