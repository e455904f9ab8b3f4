pub mod health_service;
pub mod now_playing_service;
pub mod photo_service;
pub mod repo_service;
pub mod token_service;
pub mod ttl;
