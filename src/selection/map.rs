use hashbrown::HashMap;

use super::path::FieldPath;
use crate::error::{Error, ErrorKind, Result};

/// The fields a query selects at one position.
///
/// Directly selected field names are kept in selection order. Fields selected
/// under a fragment spread are recorded per type-condition name and are *not*
/// part of the direct set: synthesis materializes only the direct (shared)
/// fields for polymorphic positions.
#[derive(Clone, Debug, Default)]
pub struct FieldSelection {
    fields: Vec<String>,
    fragment_fields: HashMap<String, Vec<String>>,
}

impl FieldSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directly selected field name, preserving first-seen order.
    pub fn add_field(&mut self, name: &str) {
        if !self.fields.iter().any(|existing| existing == name) {
            self.fields.push(name.to_string());
        }
    }

    /// Record a field selected under a fragment with the given type condition.
    pub fn add_fragment_field(&mut self, type_condition: &str, name: &str) {
        let fields = self
            .fragment_fields
            .entry(type_condition.to_string())
            .or_default();
        if !fields.iter().any(|existing| existing == name) {
            fields.push(name.to_string());
        }
    }

    /// The directly selected field names in selection order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The fields selected under a fragment condition, if any were recorded.
    pub fn fragment_fields(&self, type_condition: &str) -> Option<&[String]> {
        self.fragment_fields
            .get(type_condition)
            .map(|fields| fields.as_slice())
    }
}

/// Per-operation mapping from field path to the selection at that position.
///
/// Built by the query/AST collaborator and consumed read-only here; only type
/// synthesis needs it, to pin down the field subset of interface- and
/// union-typed positions.
#[derive(Clone, Debug, Default)]
pub struct SelectionMap {
    sites: HashMap<String, FieldSelection>,
}

impl SelectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mutable selection at a path, inserting an empty one first
    /// if the path was never seen.
    pub fn site_mut(&mut self, path: &FieldPath) -> &mut FieldSelection {
        self.sites.entry(path.key()).or_default()
    }

    /// The selection recorded at a path, if any.
    pub fn site(&self, path: &FieldPath) -> Option<&FieldSelection> {
        self.sites.get(&path.key())
    }

    /// The directly selected field names at a path. Paths without a recorded
    /// selection yield an empty set.
    pub fn type_fields(&self, path: &FieldPath) -> &[String] {
        self.site(path).map(FieldSelection::fields).unwrap_or(&[])
    }
}

/// All selection maps of one query document, keyed by operation name.
#[derive(Clone, Debug, Default)]
pub struct OperationSelections {
    operations: Vec<(String, SelectionMap)>,
}

impl OperationSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation's selection map, preserving document order.
    pub fn add_operation(&mut self, name: &str, selection: SelectionMap) {
        self.operations.push((name.to_string(), selection));
    }

    /// Resolves the selection map to run against.
    ///
    /// A named lookup must match exactly one operation; an unnamed lookup is
    /// only unambiguous when the document defines exactly one.
    pub fn select(&self, operation_name: Option<&str>) -> Result<&SelectionMap> {
        match operation_name {
            Some(name) => self
                .operations
                .iter()
                .find(|(candidate, _)| candidate == name)
                .map(|(_, selection)| selection)
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::AmbiguousOperation,
                        format!("document defines no operation named \"{name}\""),
                    )
                }),
            None => match self.operations.as_slice() {
                [(_, selection)] => Ok(selection),
                [] => Err(Error::new(
                    ErrorKind::AmbiguousOperation,
                    "document defines no operations",
                )),
                _ => Err(Error::new(
                    ErrorKind::AmbiguousOperation,
                    format!(
                        "no operation name given but document defines {} operations",
                        self.operations.len()
                    ),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet_selection() -> SelectionMap {
        let mut selection = SelectionMap::new();
        let site = selection.site_mut(&FieldPath::from(["pet"]));
        site.add_field("name");
        site.add_fragment_field("Dog", "breed");
        selection
    }

    #[test]
    fn direct_and_fragment_fields_stay_separate() {
        let selection = pet_selection();
        let path = FieldPath::from(["pet"]);

        assert_eq!(selection.type_fields(&path), &["name".to_string()]);
        let site = selection.site(&path).unwrap();
        assert_eq!(site.fragment_fields("Dog"), Some(&["breed".to_string()][..]));
        assert_eq!(site.fragment_fields("Cat"), None);
    }

    #[test]
    fn unknown_path_has_no_fields() {
        let selection = pet_selection();
        assert!(selection.type_fields(&FieldPath::from(["hero"])).is_empty());
    }

    #[test]
    fn named_operation_resolution() {
        let mut operations = OperationSelections::new();
        operations.add_operation("GetPet", pet_selection());
        operations.add_operation("GetHero", SelectionMap::new());

        assert!(operations.select(Some("GetPet")).is_ok());
        let error = operations.select(Some("Missing")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::AmbiguousOperation);
    }

    #[test]
    fn unnamed_operation_requires_exactly_one() {
        let mut operations = OperationSelections::new();
        let error = operations.select(None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::AmbiguousOperation);

        operations.add_operation("GetPet", pet_selection());
        assert!(operations.select(None).is_ok());

        operations.add_operation("GetHero", SelectionMap::new());
        let error = operations.select(None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::AmbiguousOperation);
    }
}
