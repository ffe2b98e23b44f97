//! Request extractors whose rejections render through [`Error`].

use crate::errors::Error;
use axum::extract::{FromRequest, FromRequestParts};

/// [`axum::Json`] with `{error, code, field}` rejections.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// [`axum::extract::Path`] with `{error, code, field}` rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

/// [`axum::extract::Query`] with `{error, code, field}` rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);
