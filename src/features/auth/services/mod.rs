mod admin_session_service;

pub use admin_session_service::AdminSessionService;
