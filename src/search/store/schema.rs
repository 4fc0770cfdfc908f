//! Tantivy schema for content documents
//!
//! Three fields: the item id (raw, exact-match, stored), its display title
//! and the assembled article (both tokenized with the default analyzer).

use tantivy::schema::{Field, FieldType, STORED, STRING, Schema, TEXT};

const ID_FIELD: &str = "id";
const TITLE_FIELD: &str = "title";
const ARTICLE_FIELD: &str = "article";

/// Expected field count for the current schema
pub const EXPECTED_FIELD_COUNT: usize = 3;

/// Schema validation errors
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Field '{field}' not found in schema")]
    FieldNotFound { field: String },

    #[error("Incompatible field type for '{field}': expected text")]
    IncompatibleFieldType { field: String },

    #[error("Schema has {found} fields, expected {expected}")]
    FieldCount { found: usize, expected: usize },
}

/// Search schema with resolved field handles
#[derive(Debug, Clone)]
pub struct IndexSchema {
    pub schema: Schema,
    pub id: Field,
    pub title: Field,
    pub article: Field,
}

impl IndexSchema {
    /// Build the schema used for newly created indexes
    #[must_use]
    pub fn build() -> Self {
        let mut builder = Schema::builder();
        let id = builder.add_text_field(ID_FIELD, STRING | STORED);
        let title = builder.add_text_field(TITLE_FIELD, TEXT | STORED);
        let article = builder.add_text_field(ARTICLE_FIELD, TEXT);
        Self {
            schema: builder.build(),
            id,
            title,
            article,
        }
    }

    /// Resolve field handles from the schema of an existing index
    pub fn from_existing(schema: &Schema) -> Result<Self, SchemaError> {
        let found = schema.fields().count();
        if found != EXPECTED_FIELD_COUNT {
            return Err(SchemaError::FieldCount {
                found,
                expected: EXPECTED_FIELD_COUNT,
            });
        }

        let text_field = |name: &str| -> Result<Field, SchemaError> {
            let field = schema
                .get_field(name)
                .map_err(|_| SchemaError::FieldNotFound {
                    field: name.to_string(),
                })?;
            match schema.get_field_entry(field).field_type() {
                FieldType::Str(_) => Ok(field),
                _ => Err(SchemaError::IncompatibleFieldType {
                    field: name.to_string(),
                }),
            }
        };

        Ok(Self {
            schema: schema.clone(),
            id: text_field(ID_FIELD)?,
            title: text_field(TITLE_FIELD)?,
            article: text_field(ARTICLE_FIELD)?,
        })
    }

    /// Fields searched by full-text queries
    #[must_use]
    pub fn searchable_fields(&self) -> [Field; 2] {
        [self.title, self.article]
    }
}
