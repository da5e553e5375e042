use serde::Serialize;

use crate::logic::errors::{ActionError, FieldError};
use crate::logic::upload::object_key;
use crate::model::{trimmed_optional, NewProduct, Product};
use crate::store::{BlobStore, ProductStore};

/// A file picked in the product form, not yet uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Url(String),
    File(UploadedFile),
    /// A file that went past the size cap while being received; its bytes were discarded
    Oversized { file_name: String, size: usize },
}

/// Field values and validation state of the "add product" modal
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub title: String,
    pub notes: String,
    pub image: Option<ImageSource>,
    errors: Vec<FieldError>,
}

/// What the page shows for the form: current values and field errors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductFormView {
    pub title: String,
    pub notes: String,
    pub image_url: Option<String>,
    pub file_name: Option<String>,
    pub errors: Vec<FieldError>,
}

impl ProductForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(&mut self, title: String, notes: String, image: Option<ImageSource>) {
        self.title = title;
        self.notes = notes;
        self.image = image;
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check every field and remember the failures. Makes no store calls.
    pub fn validate(&mut self, max_upload_bytes: usize) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError::TitleRequired);
        }

        match &self.image {
            None => errors.push(FieldError::ImageRequired),
            Some(ImageSource::Url(url)) if url.trim().is_empty() => {
                errors.push(FieldError::ImageRequired)
            }
            Some(ImageSource::File(file)) if file.bytes.is_empty() => {
                errors.push(FieldError::ImageRequired)
            }
            Some(ImageSource::File(file)) if file.bytes.len() > max_upload_bytes => {
                errors.push(FieldError::FileTooLarge {
                    size: file.bytes.len(),
                    limit: max_upload_bytes,
                })
            }
            Some(ImageSource::Oversized { size, .. }) => errors.push(FieldError::FileTooLarge {
                size: *size,
                limit: max_upload_bytes,
            }),
            Some(_) => {}
        }

        self.errors = errors.clone();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, upload the image when a file was chosen, then create the product.
    ///
    /// The form keeps its values on any failure; the caller resets it on success.
    pub async fn submit<S, B>(
        &mut self,
        store: &S,
        blobs: &B,
        max_upload_bytes: usize,
    ) -> Result<Product, ActionError>
    where
        S: ProductStore + ?Sized,
        B: BlobStore + ?Sized,
    {
        self.validate(max_upload_bytes)
            .map_err(ActionError::Validation)?;

        let image = match &self.image {
            Some(ImageSource::Url(url)) => url.trim().to_string(),
            Some(ImageSource::File(file)) => {
                let key = object_key(&file.file_name, chrono::Utc::now());
                blobs
                    .put(&key, file.bytes.clone(), file.content_type.as_deref())
                    .await?
            }
            Some(ImageSource::Oversized { size, .. }) => {
                return Err(ActionError::Validation(vec![FieldError::FileTooLarge {
                    size: *size,
                    limit: max_upload_bytes,
                }]))
            }
            None => return Err(ActionError::Validation(vec![FieldError::ImageRequired])),
        };

        let product = store
            .create_product(NewProduct {
                title: self.title.trim().to_string(),
                notes: trimmed_optional(&self.notes),
                image,
            })
            .await?;

        Ok(product)
    }

    pub fn view(&self) -> ProductFormView {
        let (image_url, file_name) = match &self.image {
            Some(ImageSource::Url(url)) => (Some(url.clone()), None),
            Some(ImageSource::File(file)) => (None, Some(file.file_name.clone())),
            Some(ImageSource::Oversized { file_name, .. }) => (None, Some(file_name.clone())),
            None => (None, None),
        };
        ProductFormView {
            title: self.title.clone(),
            notes: self.notes.clone(),
            image_url,
            file_name,
            errors: self.errors.clone(),
        }
    }
}
