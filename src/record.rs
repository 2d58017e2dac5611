use serde_json::{Map, Value};

use crate::error::{Diagnostic, Error};

/// The data a resume is rendered from. Never mutated in place; the `with_*`
/// and `without_*` methods return updated copies.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResumeRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub skills: String,
    pub languages: String,
    pub work_experience: Vec<WorkExperience>,
    pub education_list: Vec<Education>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkExperience {
    pub job_title: String,
    pub company_name: String,
    pub work_period: String,
    pub experience_details: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Education {
    pub school_name: String,
    pub degree: String,
    pub graduation_year: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Address,
}

impl ResumeRecord {
    pub fn with_contact(&self, field: ContactField, value: impl Into<String>) -> Self {
        let mut record = self.clone();
        let slot = match field {
            ContactField::Name => &mut record.name,
            ContactField::Email => &mut record.email,
            ContactField::Phone => &mut record.phone,
            ContactField::Address => &mut record.address,
        };
        *slot = value.into();
        record
    }

    pub fn with_skills(&self, skills: impl Into<String>) -> Self {
        Self {
            skills: skills.into(),
            ..self.clone()
        }
    }

    pub fn with_languages(&self, languages: impl Into<String>) -> Self {
        Self {
            languages: languages.into(),
            ..self.clone()
        }
    }

    pub fn with_work_experience(&self, entry: WorkExperience) -> Self {
        let mut record = self.clone();
        record.work_experience.push(entry);
        record
    }

    /// An out-of-range index leaves the list as it is.
    pub fn without_work_experience(&self, index: usize) -> Self {
        Self {
            work_experience: without_index(&self.work_experience, index),
            ..self.clone()
        }
    }

    pub fn with_education(&self, entry: Education) -> Self {
        let mut record = self.clone();
        record.education_list.push(entry);
        record
    }

    /// An out-of-range index leaves the list as it is.
    pub fn without_education(&self, index: usize) -> Self {
        Self {
            education_list: without_index(&self.education_list, index),
            ..self.clone()
        }
    }

    pub fn from_json_str(text: &str) -> Result<(Self, Vec<Diagnostic>), Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_json(&value))
    }

    /// Reads a record in the resume form's JSON shape.
    ///
    /// Values that should be strings but are missing or of another type are
    /// replaced by empty strings, and each replacement is reported.
    pub fn from_json(value: &Value) -> (Self, Vec<Diagnostic>) {
        let mut reader = Reader::default();
        let Some(object) = value.as_object() else {
            reader.report("record", Some(value));
            return (Self::default(), reader.diagnostics);
        };

        let languages_key = if object.contains_key("languages") {
            "languages"
        } else {
            "Languages"
        };

        let work_experience = reader
            .list(object, "workExperience")
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let path = format!("workExperience[{i}]");
                let entry = reader.object(entry, &path);
                WorkExperience {
                    job_title: reader.string(entry, &path, "jobTitle"),
                    company_name: reader.string(entry, &path, "companyName"),
                    work_period: reader.string(entry, &path, "workPeriod"),
                    experience_details: reader.string(entry, &path, "experienceDetails"),
                }
            })
            .collect();

        let education_list = reader
            .list(object, "educationList")
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let path = format!("educationList[{i}]");
                let entry = reader.object(entry, &path);
                Education {
                    school_name: reader.string(entry, &path, "schoolName"),
                    degree: reader.string(entry, &path, "degree"),
                    graduation_year: reader.string(entry, &path, "graduationYear"),
                }
            })
            .collect();

        let record = Self {
            name: reader.string(Some(object), "", "name"),
            email: reader.string(Some(object), "", "email"),
            phone: reader.string(Some(object), "", "phone"),
            address: reader.string(Some(object), "", "address"),
            skills: reader.string(Some(object), "", "skills"),
            languages: reader.string(Some(object), "", languages_key),
            work_experience,
            education_list,
        };
        (record, reader.diagnostics)
    }
}

fn without_index<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

#[derive(Default)]
struct Reader {
    diagnostics: Vec<Diagnostic>,
}

impl Reader {
    fn string(&mut self, object: Option<&Map<String, Value>>, parent: &str, key: &str) -> String {
        let value = object.and_then(|object| object.get(key));
        match value {
            Some(Value::String(s)) => s.clone(),
            _ => {
                self.report(&join_path(parent, key), value);
                String::new()
            }
        }
    }

    fn list<'v>(&mut self, object: &'v Map<String, Value>, key: &str) -> &'v [Value] {
        match object.get(key) {
            Some(Value::Array(items)) => items.as_slice(),
            other => {
                self.report(key, other);
                &[]
            }
        }
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.report(path, Some(value));
        }
        object
    }

    fn report(&mut self, field: &str, value: Option<&Value>) {
        let diagnostic = Diagnostic::InvalidInput {
            field: field.to_owned(),
            found: describe(value),
        };
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

fn describe(value: Option<&Value>) -> &'static str {
    match value {
        None => "missing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "a boolean",
        Some(Value::Number(_)) => "a number",
        Some(Value::String(_)) => "a string",
        Some(Value::Array(_)) => "an array",
        Some(Value::Object(_)) => "an object",
    }
}
