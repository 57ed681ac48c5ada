//! # Configuration Module
//!
//! 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - MongoDB 연결, 서버 바인딩, 링크 도메인 설정
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # MongoDB
//! export MONGO_USER="user"
//! export MONGO_PASS="secret"
//! export MONGO_HOST="user-db:27017"
//! export MONGO_TIMEOUT_SECS="30"
//!
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="8084"
//!
//! # 하이퍼미디어 링크
//! export LINK_DOMAIN="user"
//! ```
//!
//! `PROFILE` 값에 따라 `.env.dev` / `.env.prod` / `.env` 파일이 먼저 로드됩니다.

pub mod data_config;

pub use data_config::*;
