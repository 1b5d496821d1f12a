use crate::api::ParsedField;

/// Fields exactly as the service returned them for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResultSet {
    fields: Vec<ParsedField>,
}

impl ParsedResultSet {
    pub fn new(fields: Vec<ParsedField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[ParsedField] {
        &self.fields
    }

    pub fn get(&self, field_name: &str) -> Option<&ParsedField> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A field whose working value no longer matches the parsed one.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field_name: String,
    pub original: String,
    pub edited: String,
}

/// Working copy the user edits. Owns its own records; the set of field
/// names never changes after seeding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditableResultSet {
    fields: Vec<ParsedField>,
}

impl EditableResultSet {
    pub fn from_original(original: &ParsedResultSet) -> Self {
        Self {
            fields: original.fields.iter().cloned().collect(),
        }
    }

    pub fn fields(&self) -> &[ParsedField] {
        &self.fields
    }

    pub fn get(&self, field_name: &str) -> Option<&ParsedField> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Replaces the value of every field named `field_name` with a fresh
    /// record. Returns false when no field matched.
    pub fn set_value(&mut self, field_name: &str, new_value: &str) -> bool {
        let mut matched = false;
        for field in self.fields.iter_mut().filter(|f| f.field_name == field_name) {
            *field = ParsedField {
                parsed_value: new_value.to_string(),
                ..field.clone()
            };
            matched = true;
        }
        matched
    }

    pub fn changes_from(&self, original: &ParsedResultSet) -> Vec<FieldChange> {
        self.fields
            .iter()
            .zip(original.fields.iter())
            .filter(|(edited, parsed)| edited.parsed_value != parsed.parsed_value)
            .map(|(edited, parsed)| FieldChange {
                field_name: edited.field_name.clone(),
                original: parsed.parsed_value.clone(),
                edited: edited.parsed_value.clone(),
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}
