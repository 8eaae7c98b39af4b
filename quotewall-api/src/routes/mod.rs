/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `quotes`: Quote CRUD endpoints with ownership checks
/// - `users`: Account management endpoints

pub mod auth;
pub mod health;
pub mod quotes;
pub mod users;
