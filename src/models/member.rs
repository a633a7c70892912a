// src/models/member.rs
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    // nama field di database tetap "anggota"
    #[serde(rename = "anggota")]
    pub group: String,
    #[serde(default)]
    pub parent1_id: Option<i64>,
    #[serde(default)]
    pub parent2_id: Option<i64>,
}

impl Member {
    pub fn new(id: i64, name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            group: group.into(),
            parent1_id: None,
            parent2_id: None,
        }
    }

    pub fn with_parents(mut self, parent1_id: Option<i64>, parent2_id: Option<i64>) -> Self {
        self.parent1_id = parent1_id;
        self.parent2_id = parent2_id;
        self
    }

    pub fn parents(&self) -> [Option<i64>; 2] {
        [self.parent1_id, self.parent2_id]
    }

    /// Applies a partial update; fields absent from the payload keep their value.
    pub fn apply(&mut self, update: MemberUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(group) = update.group {
            self.group = group;
        }
        if let Some(parent1_id) = update.parent1_id {
            self.parent1_id = parent1_id;
        }
        if let Some(parent2_id) = update.parent2_id {
            self.parent2_id = parent2_id;
        }
    }
}

/// Payload for POST /family. Everything is optional here so that a missing
/// field can be reported by name instead of as a generic JSON error.
#[derive(Debug, Default, Deserialize)]
pub struct NewMember {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "anggota")]
    pub group: Option<String>,
    pub parent1_id: Option<i64>,
    pub parent2_id: Option<i64>,
}

impl NewMember {
    pub fn into_member(self) -> Result<Member, ApiError> {
        let id = self.id.ok_or_else(|| ApiError::validation("id"))?;
        let name = self.name.ok_or_else(|| ApiError::validation("name"))?;
        let group = self.group.ok_or_else(|| ApiError::validation("anggota"))?;

        Ok(Member {
            id,
            name,
            group,
            parent1_id: self.parent1_id,
            parent2_id: self.parent2_id,
        })
    }
}

/// Payload for PUT /family/{id}.
///
/// Parent ids are tri-state: absent keeps the old value, `null` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct MemberUpdate {
    pub name: Option<String>,
    #[serde(rename = "anggota")]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub parent1_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub parent2_id: Option<Option<i64>>,
}

// Dipanggil hanya kalau key ada di payload, termasuk saat nilainya null.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FamilyResponse {
    pub family: Vec<Member>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn member_serializes_group_as_anggota_and_keeps_null_parents() {
        let member = Member::new(1, "Budi", "Ayah");
        let value = serde_json::to_value(&member).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "Budi",
                "anggota": "Ayah",
                "parent1_id": null,
                "parent2_id": null
            })
        );
    }

    #[test]
    fn member_without_parent_keys_decodes_as_absent() {
        let member: Member =
            serde_json::from_value(json!({"id": 2, "name": "Sari", "anggota": "Anak"})).unwrap();

        assert_eq!(member.parents(), [None, None]);
    }

    #[test]
    fn member_round_trips_losslessly() {
        let members = vec![
            Member::new(1, "A", "G"),
            Member::new(2, "B", "G").with_parents(Some(1), None),
            Member::new(3, "C", "G").with_parents(Some(1), Some(2)),
        ];

        let encoded = serde_json::to_string(&members).unwrap();
        let decoded: Vec<Member> = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, members);
    }

    #[test]
    fn new_member_reports_first_missing_field() {
        let payload: NewMember = serde_json::from_value(json!({"id": 1, "anggota": "G"})).unwrap();
        let err = payload.into_member().unwrap_err();

        assert!(matches!(err, ApiError::Validation { ref field } if field == "name"));
    }

    #[test]
    fn new_member_treats_null_as_missing() {
        let payload: NewMember =
            serde_json::from_value(json!({"id": 1, "name": "A", "anggota": null})).unwrap();
        let err = payload.into_member().unwrap_err();

        assert!(matches!(err, ApiError::Validation { ref field } if field == "anggota"));
    }

    #[test]
    fn new_member_defaults_parents_to_absent() {
        let payload: NewMember =
            serde_json::from_value(json!({"id": 5, "name": "E", "anggota": "G"})).unwrap();
        let member = payload.into_member().unwrap();

        assert_eq!(member, Member::new(5, "E", "G"));
    }

    #[test]
    fn update_distinguishes_absent_from_null_parent() {
        let mut member = Member::new(3, "C", "G").with_parents(Some(1), Some(2));
        let update: MemberUpdate =
            serde_json::from_value(json!({"name": "Cici", "parent2_id": null})).unwrap();

        member.apply(update);

        assert_eq!(member.name, "Cici");
        assert_eq!(member.group, "G");
        assert_eq!(member.parents(), [Some(1), None]);
    }

    #[test]
    fn update_sets_new_parent_value() {
        let mut member = Member::new(3, "C", "G");
        let update: MemberUpdate =
            serde_json::from_value(json!({"parent1_id": 7, "anggota": "Cucu"})).unwrap();

        member.apply(update);

        assert_eq!(member.parents(), [Some(7), None]);
        assert_eq!(member.group, "Cucu");
    }
}
