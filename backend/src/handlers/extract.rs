//! Extractors whose rejections render as `AppError` JSON instead of axum's plain text.

use axum::{
    extract::{FromRequest, FromRequestParts, Query},
    Json,
};

use crate::error::AppError;

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
