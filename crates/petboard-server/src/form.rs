//! Form payloads and creation-form validation.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use petboard_types::{PetDraft, PetEdit, PetRef, TypeError};
use petboard_upload::{is_allowed, PhotoUpload};
use serde::Deserialize;
use tracing::debug;

pub const MISSING_FIELDS: &str = "All fields (name, breed, age) are required.";
pub const MISSING_PHOTO: &str = "A photo file is required.";
pub const UNSUPPORTED_TYPE: &str = "Unsupported file type. Allowed: .jpg, .jpeg, .png, .gif";
pub const FILE_TOO_LARGE: &str = "The uploaded file is too large.";
pub const UNREADABLE_FORM: &str = "The submitted form could not be read. Please try again.";

/// Fields of the multipart creation form, text already trimmed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub name: String,
    pub breed: String,
    pub age: String,
    /// `None` when no file was chosen.
    pub photo: Option<PhotoUpload>,
}

impl CreateForm {
    /// Collect the form from a multipart body.
    ///
    /// A body that is cut off or exceeds the upload limit fails as a whole;
    /// the caller reports it instead of treating the fields as missing.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "photo" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;
                if !filename.is_empty() {
                    form.photo = Some(PhotoUpload::new(filename, content_type, data));
                }
                continue;
            }
            let text = field.text().await?.trim().to_string();
            match name.as_str() {
                "name" => form.name = text,
                "breed" => form.breed = text,
                "age" => form.age = text,
                other => debug!(field = %other, "ignoring unknown form field"),
            }
        }
        Ok(form)
    }

    /// Check every rule and report all failures, not just the first.
    pub fn validate(&self) -> Result<(PetDraft, &PhotoUpload), Vec<String>> {
        let mut errors = Vec::new();
        let draft = PetDraft::new(&self.name, &self.breed, &self.age);
        if draft.has_missing_fields() {
            errors.push(MISSING_FIELDS.to_string());
        }
        match &self.photo {
            None => errors.push(MISSING_PHOTO.to_string()),
            Some(photo) if !is_allowed(&photo.filename) => {
                errors.push(UNSUPPORTED_TYPE.to_string())
            }
            Some(_) => {}
        }
        match (&self.photo, errors.is_empty()) {
            (Some(photo), true) => Ok((draft, photo)),
            _ => Err(errors),
        }
    }
}

/// User-facing message for a creation body that could not be read.
pub fn read_failure_message(error: &MultipartError) -> &'static str {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        FILE_TOO_LARGE
    } else {
        UNREADABLE_FORM
    }
}

/// Adopt and delete submissions.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RefForm {
    pub pet_id: Option<String>,
    pub pet_index: Option<String>,
}

impl RefForm {
    pub fn pet_ref(&self) -> Result<PetRef, TypeError> {
        PetRef::parse(self.pet_id.as_deref(), self.pet_index.as_deref())
    }
}

/// Edit submissions.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EditForm {
    pub pet_id: Option<String>,
    pub pet_index: Option<String>,
    #[serde(default)]
    pub edit_name: String,
    #[serde(default)]
    pub edit_breed: String,
    #[serde(default)]
    pub edit_age: String,
}

impl EditForm {
    pub fn pet_ref(&self) -> Result<PetRef, TypeError> {
        PetRef::parse(self.pet_id.as_deref(), self.pet_index.as_deref())
    }

    pub fn edit(&self) -> PetEdit {
        PetEdit {
            name: self.edit_name.trim().to_string(),
            breed: self.edit_breed.trim().to_string(),
            age: self.edit_age.trim().to_string(),
        }
    }
}
