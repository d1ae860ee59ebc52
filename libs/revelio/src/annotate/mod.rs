mod config;
mod credentials;
mod types;
mod vision_api_call;

pub use config::{AnnotatorConfig, DEFAULT_ENDPOINT};
pub use credentials::{Credentials, CLOUD_PLATFORM_SCOPE};
pub use types::{
    AnnotateImageRequest, AnnotateImageResponse, BatchAnnotateImagesRequest,
    BatchAnnotateImagesResponse, EntityAnnotation, FaceAnnotation, Feature, Image, Likelihood,
    Mode,
};
pub use vision_api_call::VisionClient;

use crate::common::Result;

/// Anything that can answer a batch annotate call: the real service or a test stub.
#[allow(async_fn_in_trait)]
pub trait AnnotationService {
    async fn annotate(
        &self,
        batch: &BatchAnnotateImagesRequest,
    ) -> Result<BatchAnnotateImagesResponse>;
}

impl<S: AnnotationService> AnnotationService for &S {
    async fn annotate(
        &self,
        batch: &BatchAnnotateImagesRequest,
    ) -> Result<BatchAnnotateImagesResponse> {
        (**self).annotate(batch).await
    }
}
