//! KDL file format for the `config` crate
//!
//! The deployment mounts a `config.kdl` document. This module maps KDL nodes
//! onto the value tree the `config` crate deserializes from, so KDL files can
//! be layered with environment overrides like any built-in format.
//!
//! # Mapping rules
//! - Node names have `-` replaced by `_` (`target-dir` -> `target_dir`)
//! - `name "value"` becomes a scalar
//! - `name 1 2 3` becomes an array
//! - A node with properties or children becomes a table; a single positional
//!   argument is stored under `argument`, several under `arguments`
//! - A bare `name` node is `true`
//! - Names registered as repeated are always collected into arrays

use std::error::Error;

use config::{FileStoredFormat, Format, Map, Value, ValueKind};
use kdl::{KdlDocument, KdlNode, KdlValue};

/// Key holding the single positional argument of a table node.
pub const ARGUMENT_KEY: &str = "argument";

/// Key holding several positional arguments of a table node.
pub const ARGUMENTS_KEY: &str = "arguments";

/// Node names that always form an array, even when they appear once.
const DEFAULT_REPEATED: &[&str] = &["shortcut"];

/// `config` crate format backed by the `kdl` parser.
#[derive(Debug, Clone)]
pub struct KdlFormat {
    repeated: &'static [&'static str],
}

impl KdlFormat {
    /// Format with a custom set of always-repeated node names.
    pub fn with_repeated(repeated: &'static [&'static str]) -> Self {
        Self { repeated }
    }

    fn document_to_table(
        &self,
        uri: Option<&String>,
        document: &KdlDocument,
    ) -> Result<Map<String, Value>, Box<dyn Error + Send + Sync>> {
        let mut table = Map::new();

        for node in document.nodes() {
            let key = normalize_key(node.name().value());
            let value = self.node_to_value(uri, node)?;

            if self.repeated.contains(&key.as_str()) {
                let slot = table
                    .entry(key)
                    .or_insert_with(|| Value::new(uri, ValueKind::Array(Vec::new())));
                if let ValueKind::Array(items) = &mut slot.kind {
                    items.push(value);
                }
            } else {
                table.insert(key, value);
            }
        }

        Ok(table)
    }

    fn node_to_value(
        &self,
        uri: Option<&String>,
        node: &KdlNode,
    ) -> Result<Value, Box<dyn Error + Send + Sync>> {
        let mut arguments = Vec::new();
        let mut properties = Vec::new();

        for entry in node.entries() {
            let value = scalar_value(uri, entry.value())?;
            match entry.name() {
                Some(name) => properties.push((normalize_key(name.value()), value)),
                None => arguments.push(value),
            }
        }

        let children = node.children();

        if properties.is_empty() && children.is_none() {
            return Ok(match arguments.len() {
                0 => Value::new(uri, ValueKind::Boolean(true)),
                1 => arguments.remove(0),
                _ => Value::new(uri, ValueKind::Array(arguments)),
            });
        }

        let mut table = match children {
            Some(children) => self.document_to_table(uri, children)?,
            None => Map::new(),
        };

        for (key, value) in properties {
            table.insert(key, value);
        }

        match arguments.len() {
            0 => {}
            1 => {
                table.insert(ARGUMENT_KEY.to_string(), arguments.remove(0));
            }
            _ => {
                table.insert(
                    ARGUMENTS_KEY.to_string(),
                    Value::new(uri, ValueKind::Array(arguments)),
                );
            }
        }

        Ok(Value::new(uri, ValueKind::Table(table)))
    }
}

impl Default for KdlFormat {
    fn default() -> Self {
        Self::with_repeated(DEFAULT_REPEATED)
    }
}

impl Format for KdlFormat {
    fn parse(
        &self,
        uri: Option<&String>,
        text: &str,
    ) -> Result<Map<String, Value>, Box<dyn Error + Send + Sync>> {
        let document: KdlDocument = text.parse()?;
        self.document_to_table(uri, &document)
    }
}

impl FileStoredFormat for KdlFormat {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["kdl"]
    }
}

fn normalize_key(name: &str) -> String {
    name.replace('-', "_")
}

fn scalar_value(
    uri: Option<&String>,
    value: &KdlValue,
) -> Result<Value, Box<dyn Error + Send + Sync>> {
    let kind = match value {
        KdlValue::String(s) => ValueKind::String(s.clone()),
        KdlValue::Integer(i) => match i64::try_from(*i) {
            Ok(i) => ValueKind::I64(i),
            Err(_) => ValueKind::I128(*i),
        },
        KdlValue::Float(f) => ValueKind::Float(*f),
        KdlValue::Bool(b) => ValueKind::Boolean(*b),
        KdlValue::Null => ValueKind::Nil,
    };
    Ok(Value::new(uri, kind))
}
