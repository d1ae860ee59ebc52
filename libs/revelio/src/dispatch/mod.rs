//! Turns a (mode, image path) pair into one annotate call and the lines to print.
//!
//! The three detection kinds differ only in the requested feature, its result
//! cap and which part of the response gets rendered, so they all run through
//! [`detect`] driven by a [`ModeSpec`].

use std::path::Path;

use crate::annotate::{
    AnnotateImageRequest, AnnotateImageResponse, AnnotationService, BatchAnnotateImagesRequest,
    Feature, Image, Mode,
};
use crate::common::{read_image_base64, Result, RevelioError};

const MAX_RESULTS: u32 = 5;

type Render = fn(&AnnotateImageResponse, &Path) -> Vec<String>;

#[derive(Clone, Copy)]
pub struct ModeSpec {
    pub feature_type: &'static str,
    pub max_results: Option<u32>,
    render: Render,
}

impl ModeSpec {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Text => ModeSpec {
                feature_type: "TEXT_DETECTION",
                max_results: None,
                render: render_text,
            },
            Mode::Label => ModeSpec {
                feature_type: "LABEL_DETECTION",
                max_results: Some(MAX_RESULTS),
                render: render_labels,
            },
            Mode::Face => ModeSpec {
                feature_type: "FACE_DETECTION",
                max_results: Some(MAX_RESULTS),
                render: render_faces,
            },
        }
    }

    pub fn feature(&self) -> Feature {
        Feature {
            feature_type: self.feature_type.to_string(),
            max_results: self.max_results,
        }
    }

    pub fn render(&self, response: &AnnotateImageResponse, path: &Path) -> Vec<String> {
        (self.render)(response, path)
    }
}

pub fn build_request(mode: Mode, image_base64: String) -> BatchAnnotateImagesRequest {
    BatchAnnotateImagesRequest::single(AnnotateImageRequest {
        image: Image {
            content: image_base64,
        },
        features: vec![ModeSpec::for_mode(mode).feature()],
    })
}

/// Reads `path`, submits it for `mode` and returns the output lines.
///
/// The file is read before the service is touched, so an unreadable path never
/// produces a network call. Service errors are returned unchanged.
pub async fn detect<S: AnnotationService>(
    service: &S,
    mode: Mode,
    path: &Path,
) -> Result<Vec<String>> {
    let spec = ModeSpec::for_mode(mode);
    let image_base64 = read_image_base64(path).await?;
    let batch = build_request(mode, image_base64);

    log::info!("Requesting {} for {}", spec.feature_type, path.display());
    let res = service.annotate(&batch).await?;

    let response = res.responses.first().ok_or_else(|| {
        RevelioError::MalformedResponse("no response for the submitted image".to_string())
    })?;
    Ok(spec.render(response, path))
}

pub async fn detect_text<S: AnnotationService>(service: &S, path: &Path) -> Result<Vec<String>> {
    detect(service, Mode::Text, path).await
}

pub async fn detect_labels<S: AnnotationService>(service: &S, path: &Path) -> Result<Vec<String>> {
    detect(service, Mode::Label, path).await
}

pub async fn detect_faces<S: AnnotationService>(service: &S, path: &Path) -> Result<Vec<String>> {
    detect(service, Mode::Face, path).await
}

fn render_text(response: &AnnotateImageResponse, path: &Path) -> Vec<String> {
    match response.text_annotations.first() {
        Some(text) => vec![format!("Found text: {}", text.description)],
        None => vec![format!("Not found text in: {}", path.display())],
    }
}

fn render_labels(response: &AnnotateImageResponse, path: &Path) -> Vec<String> {
    if response.label_annotations.is_empty() {
        return vec![format!("Not found label: {}", path.display())];
    }
    response
        .label_annotations
        .iter()
        .map(|label| {
            format!(
                "Found label: {}, Score: {:.6} for {}",
                label.description,
                label.score,
                path.display()
            )
        })
        .collect()
}

fn render_faces(response: &AnnotateImageResponse, path: &Path) -> Vec<String> {
    if response.face_annotations.is_empty() {
        return vec![format!("Not found faces: {}", path.display())];
    }
    response
        .face_annotations
        .iter()
        .enumerate()
        .map(|(i, face)| {
            format!(
                "Found Face: {}, Anger: {} Joy {} Surprise {}",
                i + 1,
                face.anger_likelihood,
                face.joy_likelihood,
                face.surprise_likelihood
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{EntityAnnotation, FaceAnnotation, Likelihood};

    fn entity(description: &str, score: f32) -> EntityAnnotation {
        EntityAnnotation {
            description: description.to_string(),
            score,
        }
    }

    #[test]
    fn test_build_request_per_mode() {
        let text = build_request(Mode::Text, "AAAA".to_string());
        assert_eq!(text.requests.len(), 1);
        assert_eq!(text.requests[0].image.content, "AAAA");
        assert_eq!(text.requests[0].features[0].feature_type, "TEXT_DETECTION");
        assert_eq!(text.requests[0].features[0].max_results, None);

        let label = build_request(Mode::Label, String::new());
        assert_eq!(label.requests[0].features[0].feature_type, "LABEL_DETECTION");
        assert_eq!(label.requests[0].features[0].max_results, Some(5));

        let face = build_request(Mode::Face, String::new());
        assert_eq!(face.requests[0].features[0].feature_type, "FACE_DETECTION");
        assert_eq!(face.requests[0].features[0].max_results, Some(5));
    }

    #[test]
    fn test_render_text_uses_first_annotation_only() {
        let response = AnnotateImageResponse {
            text_annotations: vec![entity("STOP\nAHEAD", 0.0), entity("STOP", 0.0)],
            ..Default::default()
        };
        let lines = ModeSpec::for_mode(Mode::Text).render(&response, Path::new("sign.jpg"));
        assert_eq!(lines, vec!["Found text: STOP\nAHEAD".to_string()]);
    }

    #[test]
    fn test_render_labels() {
        let response = AnnotateImageResponse {
            label_annotations: vec![entity("cat", 0.9876), entity("whiskers", 0.5)],
            ..Default::default()
        };
        let lines = ModeSpec::for_mode(Mode::Label).render(&response, Path::new("cat.png"));
        assert_eq!(
            lines,
            vec![
                "Found label: cat, Score: 0.987600 for cat.png".to_string(),
                "Found label: whiskers, Score: 0.500000 for cat.png".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_faces_is_one_indexed() {
        let face = FaceAnnotation {
            anger_likelihood: Likelihood::VeryUnlikely,
            joy_likelihood: Likelihood::VeryLikely,
            surprise_likelihood: Likelihood::Possible,
        };
        let response = AnnotateImageResponse {
            face_annotations: vec![face.clone(), FaceAnnotation::default()],
            ..Default::default()
        };
        let lines = ModeSpec::for_mode(Mode::Face).render(&response, Path::new("group.jpg"));
        assert_eq!(
            lines,
            vec![
                "Found Face: 1, Anger: VERY_UNLIKELY Joy VERY_LIKELY Surprise POSSIBLE".to_string(),
                "Found Face: 2, Anger: UNKNOWN Joy UNKNOWN Surprise UNKNOWN".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_not_found_names_file() {
        let empty = AnnotateImageResponse::default();
        let path = Path::new("/tmp/blank.png");

        assert_eq!(
            ModeSpec::for_mode(Mode::Text).render(&empty, path),
            vec!["Not found text in: /tmp/blank.png".to_string()]
        );
        assert_eq!(
            ModeSpec::for_mode(Mode::Label).render(&empty, path),
            vec!["Not found label: /tmp/blank.png".to_string()]
        );
        assert_eq!(
            ModeSpec::for_mode(Mode::Face).render(&empty, path),
            vec!["Not found faces: /tmp/blank.png".to_string()]
        );
    }

    #[test]
    fn test_render_ignores_other_modes_fields() {
        let response = AnnotateImageResponse {
            label_annotations: vec![entity("dog", 0.7)],
            ..Default::default()
        };
        let lines = ModeSpec::for_mode(Mode::Text).render(&response, Path::new("dog.png"));
        assert_eq!(lines, vec!["Not found text in: dog.png".to_string()]);
    }
}
