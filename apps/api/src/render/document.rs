//! Document serialization: assembles rendered pages into one PDF.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use lopdf::content::Content;
use lopdf::{dictionary, Document as PdfDocument, Object, ObjectId, Stream, StringFormat};
use serde::Serialize;
use tracing::debug;

use crate::layout::font_metrics::{get_metrics, FontWeight};
use crate::layout::paginator::Document;
use crate::render::error::RenderError;
use crate::render::page::{to_win_ansi, BACKGROUND_XOBJECT};
use crate::render::template::BackgroundTemplate;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
const PRODUCER: &str = concat!("contracts-api ", env!("CARGO_PKG_VERSION"));

/// The finished PDF plus the metadata callers need to store or offer it.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDocument {
    #[serde(skip)]
    pub bytes: Bytes,
    pub title: String,
    pub filename: String,
    pub page_count: usize,
    /// Pages on which the footer guard stopped drawing.
    pub truncated_pages: Vec<usize>,
}

impl GeneratedDocument {
    /// Base64 form handed to the storage layer.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

/// PDF bytes with the headers to deliver them to a browser.
#[derive(Debug, Clone)]
pub struct DownloadArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
    pub inline: bool,
}

impl DownloadArtifact {
    pub fn attachment(filename: String, bytes: Bytes) -> Self {
        Self {
            filename,
            content_type: PDF_CONTENT_TYPE,
            bytes,
            inline: false,
        }
    }

    pub fn inline(filename: String, bytes: Bytes) -> Self {
        Self {
            inline: true,
            ..Self::attachment(filename, bytes)
        }
    }

    fn content_disposition(&self) -> String {
        let disposition = if self.inline { "inline" } else { "attachment" };
        format!("{disposition}; filename=\"{}\"", self.filename)
    }
}

impl IntoResponse for DownloadArtifact {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, self.content_disposition()),
                (header::CACHE_CONTROL, "no-store".to_string()),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Keeps `[A-Za-z0-9_]` from `title` and appends `.pdf`.
pub fn sanitize_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if stem.is_empty() {
        "document.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}

/// Builds the PDF from already-encoded page contents (one per page, in order).
pub fn serialize_document(
    document: &Document,
    contents: Vec<Content>,
    template: &BackgroundTemplate,
    document_type_label: &str,
) -> Result<Bytes, RenderError> {
    let constraints = &document.constraints;
    let mut pdf = PdfDocument::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let background_id = pdf.add_object(
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => template.width_px as i64,
                "Height" => template.height_px as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            template.jpeg.clone(),
        )
        .with_compression(false),
    );

    let regular_id = add_font(&mut pdf, FontWeight::Regular);
    let bold_id = add_font(&mut pdf, FontWeight::Bold);

    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            FontWeight::Regular.resource_name() => regular_id,
            FontWeight::Bold.resource_name() => bold_id,
        },
        "XObject" => dictionary! {
            BACKGROUND_XOBJECT => background_id,
        },
    });

    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        constraints.page_width.into(),
        constraints.page_height.into(),
    ];

    let mut page_ids: Vec<Object> = Vec::with_capacity(contents.len());
    for content in contents {
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id.into());
    }

    let page_count = page_ids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => page_count,
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = pdf.add_object(dictionary! {
        "Title" => Object::String(to_win_ansi(&document.title), StringFormat::Literal),
        "Subject" => Object::String(to_win_ansi(document_type_label), StringFormat::Literal),
        "Producer" => Object::string_literal(PRODUCER),
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);

    pdf.compress();

    let mut out = Vec::new();
    pdf.save_to(&mut out)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    debug!(pages = page_count, bytes = out.len(), "PDF serialized");
    Ok(Bytes::from(out))
}

fn add_font(pdf: &mut PdfDocument, weight: FontWeight) -> ObjectId {
    pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => get_metrics(weight).base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_everything_outside_word_chars() {
        assert_eq!(sanitize_filename("Non-Disclosure Agreement (v2)"), "NonDisclosureAgreementv2.pdf");
        assert_eq!(sanitize_filename("lease_2026"), "lease_2026.pdf");
        assert_eq!(sanitize_filename("Überweisung/../etc"), "berweisungetc.pdf");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_filename(""), "document.pdf");
        assert_eq!(sanitize_filename("  --  "), "document.pdf");
    }

    #[test]
    fn test_download_artifact_headers() {
        let artifact = DownloadArtifact::attachment("nda.pdf".into(), Bytes::from_static(b"%PDF-"));
        let response = artifact.into_response();
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], PDF_CONTENT_TYPE);
        assert_eq!(headers[header::CONTENT_DISPOSITION], "attachment; filename=\"nda.pdf\"");

        let preview = DownloadArtifact::inline("nda.pdf".into(), Bytes::new()).into_response();
        assert_eq!(preview.headers()[header::CONTENT_DISPOSITION], "inline; filename=\"nda.pdf\"");
    }

    #[test]
    fn test_base64_round_trips_bytes() {
        let doc = GeneratedDocument {
            bytes: Bytes::from_static(b"%PDF-1.5"),
            title: "T".into(),
            filename: "T.pdf".into(),
            page_count: 1,
            truncated_pages: vec![],
        };
        assert_eq!(BASE64.decode(doc.to_base64()).unwrap(), b"%PDF-1.5");
    }
}
