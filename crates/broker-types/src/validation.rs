//! Schema checks for the TOML tables that configure pluggable components.

use thiserror::Error;

/// Errors raised while checking a configuration table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(String),
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: &'static str,
		actual: String,
	},
}

/// Expected shape of a configuration value.
#[derive(Debug)]
pub enum FieldType {
	String,
	/// An `http://` or `https://` URL.
	Url,
	Integer {
		min: Option<i64>,
		max: Option<i64>,
	},
	/// A string that must be one of the listed values (case-insensitive).
	OneOf(&'static [&'static str]),
	Table(Schema),
}

pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Adds a check that runs after the type check passed.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, path: &str, value: &toml::Value) -> Result<(), ValidationError> {
		check_type(path, value, &self.field_type)?;
		if let Some(validator) = &self.validator {
			validator(value).map_err(|message| ValidationError::InvalidValue {
				field: path.to_string(),
				message,
			})?;
		}
		Ok(())
	}
}

/// Required and optional fields of one table.
#[derive(Debug, Default)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		self.validate_at("", config)
	}

	fn validate_at(&self, prefix: &str, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config.as_table().ok_or_else(|| ValidationError::TypeMismatch {
			field: if prefix.is_empty() {
				"root".to_string()
			} else {
				prefix.to_string()
			},
			expected: "table",
			actual: config.type_str().to_string(),
		})?;

		let path = |name: &str| {
			if prefix.is_empty() {
				name.to_string()
			} else {
				format!("{}.{}", prefix, name)
			}
		};

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(path(&field.name)))?;
			field.check(&path(&field.name), value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(&path(&field.name), value)?;
			}
		}

		Ok(())
	}
}

fn check_type(path: &str, value: &toml::Value, expected: &FieldType) -> Result<(), ValidationError> {
	let mismatch = |expected: &'static str| ValidationError::TypeMismatch {
		field: path.to_string(),
		expected,
		actual: value.type_str().to_string(),
	};

	match expected {
		FieldType::String => {
			value.as_str().ok_or_else(|| mismatch("string"))?;
		}
		FieldType::Url => {
			let url = value.as_str().ok_or_else(|| mismatch("string"))?;
			if !(url.starts_with("http://") || url.starts_with("https://")) {
				return Err(ValidationError::InvalidValue {
					field: path.to_string(),
					message: "URL must start with http:// or https://".to_string(),
				});
			}
		}
		FieldType::Integer { min, max } => {
			let number = value.as_integer().ok_or_else(|| mismatch("integer"))?;
			if min.is_some_and(|min| number < min) || max.is_some_and(|max| number > max) {
				return Err(ValidationError::InvalidValue {
					field: path.to_string(),
					message: format!(
						"{} is outside the allowed range {}..={}",
						number,
						min.map(|v| v.to_string()).unwrap_or_default(),
						max.map(|v| v.to_string()).unwrap_or_default()
					),
				});
			}
		}
		FieldType::OneOf(choices) => {
			let text = value.as_str().ok_or_else(|| mismatch("string"))?;
			if !choices.iter().any(|choice| choice.eq_ignore_ascii_case(text)) {
				return Err(ValidationError::InvalidValue {
					field: path.to_string(),
					message: format!("expected one of {}", choices.join(", ")),
				});
			}
		}
		FieldType::Table(schema) => schema.validate_at(path, value)?,
	}

	Ok(())
}

/// Implemented by components whose TOML table is checked before construction.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(document: &str) -> toml::Value {
		toml::Value::Table(toml::from_str(document).unwrap())
	}

	fn transport_schema() -> Schema {
		Schema::new(
			vec![Field::new("url", FieldType::Url)],
			vec![
				Field::new(
					"timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(300),
					},
				),
				Field::new("network", FieldType::OneOf(&["mainnet", "perseverance"])),
				Field::new(
					"headers",
					FieldType::Table(Schema::new(
						vec![],
						vec![Field::new("authorization", FieldType::String)],
					)),
				),
			],
		)
	}

	#[test]
	fn test_accepts_valid_table() {
		let config = parse(
			r#"
url = "https://rpc.example.org"
timeout_seconds = 30
network = "Mainnet"
[headers]
authorization = "token"
"#,
		);
		assert_eq!(transport_schema().validate(&config), Ok(()));
	}

	#[test]
	fn test_reports_missing_and_invalid_fields() {
		let missing = parse("timeout_seconds = 30");
		assert_eq!(
			transport_schema().validate(&missing),
			Err(ValidationError::MissingField("url".to_string()))
		);

		let bad_url = parse(r#"url = "ws://rpc""#);
		assert!(matches!(
			transport_schema().validate(&bad_url),
			Err(ValidationError::InvalidValue { field, .. }) if field == "url"
		));

		let bad_timeout = parse("url = \"http://rpc\"\ntimeout_seconds = 0");
		assert!(matches!(
			transport_schema().validate(&bad_timeout),
			Err(ValidationError::InvalidValue { field, .. }) if field == "timeout_seconds"
		));
	}

	#[test]
	fn test_nested_paths_in_errors() {
		let config = parse("url = \"http://rpc\"\n[headers]\nauthorization = 5");
		assert_eq!(
			transport_schema().validate(&config),
			Err(ValidationError::TypeMismatch {
				field: "headers.authorization".to_string(),
				expected: "string",
				actual: "integer".to_string(),
			})
		);
	}

	#[test]
	fn test_custom_validator() {
		let schema = Schema::new(
			vec![Field::new("account", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(account) if account.starts_with("cF") => Ok(()),
					_ => Err("expected a Chainflip account".to_string()),
				}
			})],
			vec![],
		);
		let config = parse(r#"account = "5Grw""#);
		assert!(matches!(
			schema.validate(&config),
			Err(ValidationError::InvalidValue { .. })
		));
	}
}
