// src/relationship.rs
//! Relationship lookup between one member and the rest of the family.
//!
//! Everything here is derived from the flat member list on every call and
//! only ever looks one or two parent hops away, so malformed parent cycles in
//! stored data cannot make it loop.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::member::Member;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    Child,
    Grandchild,
    #[serde(rename = "Niece/Nephew")]
    NieceNephew,
    Sibling,
}

/// Labels keyed by member id, kept in the order members appear in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    entries: Vec<(i64, Relationship)>,
    by_id: HashMap<i64, Relationship>,
}

impl Relationships {
    pub fn get(&self, id: i64) -> Option<Relationship> {
        self.by_id.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, Relationship)> + '_ {
        self.entries.iter().copied()
    }

    fn insert(&mut self, id: i64, relationship: Relationship) {
        if !self.by_id.contains_key(&id) {
            self.by_id.insert(id, relationship);
            self.entries.push((id, relationship));
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RelationshipEntry {
    pub id: i64,
    pub name: String,
    pub relationship: Relationship,
}

struct FamilyIndex<'a> {
    by_id: HashMap<i64, &'a Member>,
}

impl<'a> FamilyIndex<'a> {
    fn new(members: &'a [Member]) -> Self {
        let mut by_id = HashMap::with_capacity(members.len());
        for member in members {
            // id ganda: yang pertama yang dipakai
            by_id.entry(member.id).or_insert(member);
        }
        Self { by_id }
    }

    fn get(&self, id: Option<i64>) -> Option<&'a Member> {
        id.and_then(|id| self.by_id.get(&id).copied())
    }

    fn parent1_of(&self, id: Option<i64>) -> Option<i64> {
        self.get(id).and_then(|m| m.parent1_id)
    }
}

/// Labels every member other than `subject_id` that relates to it.
///
/// Rules are tried in priority order and the first match wins, so a member
/// gets at most one label. Members matching nothing are left out.
pub fn classify(members: &[Member], subject_id: i64) -> Relationships {
    let index = FamilyIndex::new(members);
    let subject_parent1 = index.parent1_of(Some(subject_id));
    let mut result = Relationships::default();

    for member in members {
        if member.id == subject_id {
            continue;
        }
        if let Some(relationship) = relate(&index, member, subject_id, subject_parent1) {
            result.insert(member.id, relationship);
        }
    }

    log::debug!(
        "anggota {}: {} hubungan ditemukan dari {} data",
        subject_id,
        result.len(),
        members.len()
    );
    result
}

fn relate(
    index: &FamilyIndex<'_>,
    member: &Member,
    subject_id: i64,
    subject_parent1: Option<i64>,
) -> Option<Relationship> {
    let subject = Some(subject_id);

    if member.parents().contains(&subject) {
        return Some(Relationship::Child);
    }

    // Only parent1 of the intermediate parent is followed; a grandchild through
    // a parent's parent2 is not labelled here.
    if member
        .parents()
        .into_iter()
        .any(|parent| parent.is_some() && index.parent1_of(parent) == subject)
    {
        return Some(Relationship::Grandchild);
    }

    if index
        .get(member.parent1_id)
        .is_some_and(|parent| parent.parents().contains(&subject))
    {
        return Some(Relationship::NieceNephew);
    }

    // parent1 harus benar-benar ada di data, referensi yang menggantung tidak dihitung
    if index.get(member.parent1_id).is_some() && member.parent1_id == subject_parent1 {
        return Some(Relationship::Sibling);
    }

    None
}

/// Resolves [`classify`] output into response rows with member names.
pub fn describe(members: &[Member], subject_id: i64) -> Vec<RelationshipEntry> {
    let mut names: HashMap<i64, &str> = HashMap::with_capacity(members.len());
    for member in members {
        names.entry(member.id).or_insert(member.name.as_str());
    }

    classify(members, subject_id)
        .iter()
        .map(|(id, relationship)| RelationshipEntry {
            id,
            name: names.get(&id).copied().unwrap_or("Unknown").to_string(),
            relationship,
        })
        .collect()
}
