//! 统一错误处理
//!
//! 错误类型定义在 shared::error (跨端共享错误码)；这里补充服务端
//! 特有的便捷函数。
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Order"))
//!
//! // 字段级校验错误 (HTTP 400, details.errors = [{field, msg, value}])
//! Err(validation_errors(vec![FieldError::new("product", "Product not found", id)]))
//! ```

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::utils::validation::FieldError;

/// Build a validation error carrying a structured `{field, msg, value}` list
///
/// The list lands in the response envelope under `details.errors`, so the
/// client can prune the offending cart lines.
pub fn validation_errors(errors: Vec<FieldError>) -> AppError {
    let value = serde_json::to_value(&errors).unwrap_or_default();
    AppError::validation("One or more fields failed validation").with_detail("errors", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_field_error_list() {
        let err = validation_errors(vec![FieldError::new(
            "product",
            "Product not found",
            serde_json::json!("product:missing"),
        )]);
        let details = err.details.as_ref().unwrap();
        let errors = details["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["field"], "product");
    }
}
