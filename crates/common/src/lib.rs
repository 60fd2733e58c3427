//! Pieces shared by the server crate and the binary: tracing setup and the
//! small response types that are not tied to the vehicle domain.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
        assert_eq!(h.service, "vehicles-api");
    }

    #[test]
    fn error_body_omits_missing_detail() {
        let body = types::ErrorBody::new("Not Found", None);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "Not Found");
        assert!(json.get("detail").is_none());
    }
}
