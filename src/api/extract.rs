//! Extractors whose rejections are reported as `AppError`

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON body; undecodable bodies become `AppError::Validation`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; unparsable segments become `AppError::Validation`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
