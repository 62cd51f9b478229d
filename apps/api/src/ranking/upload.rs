//! Multipart resume upload: turns uploaded PDF or text files into a ranking batch.
//!
//! Expected fields: one `job_description` text field and any number of `resume`
//! file fields. `source_index` follows upload order.

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;
use crate::scoring::ResumeDocument;

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const RESUME_FIELD: &str = "resume";
const PDF_MAGIC: &[u8] = b"%PDF";

pub struct RankUpload {
    pub job_description: String,
    pub resumes: Vec<ResumeDocument>,
}

pub async fn read_rank_upload(mut multipart: Multipart) -> Result<RankUpload, AppError> {
    let mut job_description = None;
    let mut texts = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            JOB_DESCRIPTION_FIELD => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable job_description: {e}")))?;
                job_description = Some(text);
            }
            RESUME_FIELD => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable file {file_name}: {e}")))?;
                texts.push(resume_text(&file_name, content_type.as_deref(), data).await?);
            }
            other => debug!("Ignoring unexpected multipart field '{other}'"),
        }
    }

    let job_description = job_description.ok_or_else(|| {
        AppError::Validation(format!("Missing '{JOB_DESCRIPTION_FIELD}' field"))
    })?;

    Ok(RankUpload {
        job_description,
        resumes: ResumeDocument::batch(texts),
    })
}

/// Extracts plain text from one uploaded resume. PDF parsing runs on the
/// blocking pool; a panic inside the parser surfaces as a validation error.
pub async fn resume_text(
    file_name: &str,
    content_type: Option<&str>,
    data: Bytes,
) -> Result<String, AppError> {
    if is_pdf(file_name, content_type, &data) {
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
            .await
            .map_err(|e| AppError::Validation(format!("Could not read PDF {file_name}: {e}")))?
            .map_err(|e| AppError::Validation(format!("Could not read PDF {file_name}: {e}")))
    } else {
        String::from_utf8(data.to_vec())
            .map_err(|_| AppError::Validation(format!("{file_name} is neither a PDF nor UTF-8 text")))
    }
}

fn is_pdf(file_name: &str, content_type: Option<&str>, data: &[u8]) -> bool {
    content_type == Some("application/pdf")
        || data.starts_with(PDF_MAGIC)
        || file_name.to_lowercase().ends_with(".pdf")
}
