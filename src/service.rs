use async_trait::async_trait;

use crate::{
    error::{LogoError, Result},
    models::{EditImageRequest, GenerateImageRequest},
    providers::ImageProviders,
    routes::{self, RouteResponse},
};

/// Anything that can turn an API request into an image data URL: the HTTP
/// client against a running server, or the route logic in-process.
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn generate(&self, request: &GenerateImageRequest) -> Result<String>;

    async fn edit(&self, request: &EditImageRequest) -> Result<String>;
}

#[async_trait]
impl<T: ImageService + ?Sized> ImageService for Box<T> {
    async fn generate(&self, request: &GenerateImageRequest) -> Result<String> {
        (**self).generate(request).await
    }

    async fn edit(&self, request: &EditImageRequest) -> Result<String> {
        (**self).edit(request).await
    }
}

/// Runs the API route logic directly against the configured providers.
#[derive(Clone)]
pub struct LocalService {
    providers: ImageProviders,
    session_token: Option<String>,
}

impl LocalService {
    pub fn new(providers: ImageProviders) -> Self {
        Self {
            providers,
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

pub(crate) fn into_image_url(response: RouteResponse) -> Result<String> {
    if response.is_success() {
        return response
            .image_url()
            .map(String::from)
            .ok_or_else(|| LogoError::ResponseError("response has no imageUrl".into()));
    }
    Err(LogoError::HttpError {
        status: response.status,
        body: response
            .error_message()
            .map(String::from)
            .unwrap_or_else(|| response.body.to_string()),
    })
}

#[async_trait]
impl ImageService for LocalService {
    async fn generate(&self, request: &GenerateImageRequest) -> Result<String> {
        let body = serde_json::to_value(request)
            .map_err(|e| LogoError::SerializationError(e.to_string()))?;
        let response =
            routes::generate_image(&self.providers, &body, self.session_token.as_deref()).await;
        into_image_url(response)
    }

    async fn edit(&self, request: &EditImageRequest) -> Result<String> {
        let body = serde_json::to_value(request)
            .map_err(|e| LogoError::SerializationError(e.to_string()))?;
        let response =
            routes::edit_image(&self.providers, &body, self.session_token.as_deref()).await;
        into_image_url(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::ModelOption;
    use serde_json::json;

    #[test]
    fn test_into_image_url() {
        let ok = RouteResponse {
            status: 200,
            body: json!({"imageUrl": "data:image/png;base64,AAAA"}),
        };
        assert_eq!(into_image_url(ok).unwrap(), "data:image/png;base64,AAAA");

        let failed = RouteResponse::error(500, "No image was generated");
        match into_image_url(failed) {
            Err(LogoError::HttpError { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "No image was generated");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_local_service_surfaces_route_errors() {
        let service = LocalService::new(ImageProviders::new(AppConfig::new()).unwrap());
        let request = GenerateImageRequest::new("A valid prompt", ModelOption::Gemini);

        let err = service.generate(&request).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert!(err.to_string().contains("Please sign in"));
    }
}
