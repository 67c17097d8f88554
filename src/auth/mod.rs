//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtService, TokenError, TokenProvider, TokenType};
pub use middleware::{extract_token, jwt_auth_middleware, AuthContext};
pub use password::{PasswordHasher, PasswordVerifier};
