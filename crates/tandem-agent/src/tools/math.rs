//! Built-in arithmetic tools.
//!
//! All parameters are `f64`; results are formatted without a trailing `.0`
//! for whole numbers so `add(3, 2)` reads `5`, not `5.0`.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;

use super::base::{require_f64, Tool};

/// JSON Schema for a two-operand numeric tool.
fn two_number_schema(a_desc: &str, b_desc: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "a": { "type": "number", "description": a_desc },
            "b": { "type": "number", "description": b_desc }
        },
        "required": ["a", "b"]
    })
}

/// Format a numeric result for display and transcript use.
fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// ─────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────

/// `add` — sum of two numbers.
pub struct AddTool;

#[async_trait]
impl Tool for AddTool {
    fn name(&self) -> &str {
        "add"
    }
    fn description(&self) -> &str {
        "Add two numbers together. Use this when you need the sum of two numbers."
    }
    fn parameters(&self) -> Value {
        two_number_schema("The first number", "The second number")
    }
    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<String> {
        let a = require_f64(&params, "a")?;
        let b = require_f64(&params, "b")?;
        Ok(format_value(a + b))
    }
}

/// `subtract` — a minus b.
pub struct SubtractTool;

#[async_trait]
impl Tool for SubtractTool {
    fn name(&self) -> &str {
        "subtract"
    }
    fn description(&self) -> &str {
        "Subtract one number from another. Calculates a minus b."
    }
    fn parameters(&self) -> Value {
        two_number_schema("The number to subtract from", "The number to subtract")
    }
    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<String> {
        let a = require_f64(&params, "a")?;
        let b = require_f64(&params, "b")?;
        Ok(format_value(a - b))
    }
}

/// `multiply` — product of two numbers.
pub struct MultiplyTool;

#[async_trait]
impl Tool for MultiplyTool {
    fn name(&self) -> &str {
        "multiply"
    }
    fn description(&self) -> &str {
        "Multiply two numbers together. Use this when you need the product of two numbers."
    }
    fn parameters(&self) -> Value {
        two_number_schema("The multiplicand", "The multiplier")
    }
    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<String> {
        let a = require_f64(&params, "a")?;
        let b = require_f64(&params, "b")?;
        Ok(format_value(a * b))
    }
}

/// `divide` — a divided by b. Fails on a zero divisor.
pub struct DivideTool;

#[async_trait]
impl Tool for DivideTool {
    fn name(&self) -> &str {
        "divide"
    }
    fn description(&self) -> &str {
        "Divide one number by another. Calculates a divided by b; b must not be zero."
    }
    fn parameters(&self) -> Value {
        two_number_schema("The dividend", "The divisor (must not be zero)")
    }
    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<String> {
        let a = require_f64(&params, "a")?;
        let b = require_f64(&params, "b")?;
        if b == 0.0 {
            anyhow::bail!("division by zero");
        }
        Ok(format_value(a / b))
    }
}

/// `calculate_tip` — tip amount from a bill total and a percentage.
pub struct CalculateTipTool;

#[async_trait]
impl Tool for CalculateTipTool {
    fn name(&self) -> &str {
        "calculate_tip"
    }
    fn description(&self) -> &str {
        "Calculate the tip amount for a bill from the total and a tip percentage \
         (e.g. 15 for 15%, 20 for 20%)."
    }
    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "total_bill": { "type": "number", "description": "The total bill amount" },
                "tip_percentage": { "type": "number", "description": "The tip percentage (e.g. 20 for 20%)" }
            },
            "required": ["total_bill", "tip_percentage"]
        })
    }
    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<String> {
        let total_bill = require_f64(&params, "total_bill")?;
        let tip_percentage = require_f64(&params, "tip_percentage")?;
        Ok(format_value(total_bill * (tip_percentage / 100.0)))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, f64)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[tokio::test]
    async fn test_add_whole_number_formatting() {
        let result = AddTool.execute(params(&[("a", 3.0), ("b", 2.0)])).await.unwrap();
        assert_eq!(result, "5");
    }

    #[tokio::test]
    async fn test_add_fractional() {
        let result = AddTool.execute(params(&[("a", 2.5), ("b", 1.25)])).await.unwrap();
        assert_eq!(result, "3.75");
    }

    #[tokio::test]
    async fn test_subtract() {
        let result = SubtractTool
            .execute(params(&[("a", 10.0), ("b", 4.0)]))
            .await
            .unwrap();
        assert_eq!(result, "6");
    }

    #[tokio::test]
    async fn test_multiply() {
        let result = MultiplyTool
            .execute(params(&[("a", 6.0), ("b", 7.0)]))
            .await
            .unwrap();
        assert_eq!(result, "42");
    }

    #[tokio::test]
    async fn test_divide() {
        let result = DivideTool
            .execute(params(&[("a", 7.0), ("b", 2.0)]))
            .await
            .unwrap();
        assert_eq!(result, "3.5");
    }

    #[tokio::test]
    async fn test_divide_by_zero_fails() {
        let err = DivideTool
            .execute(params(&[("a", 20.0), ("b", 0.0)]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("division by zero"));
    }

    #[tokio::test]
    async fn test_calculate_tip() {
        let result = CalculateTipTool
            .execute(
                [
                    ("total_bill".to_string(), json!(50.0)),
                    ("tip_percentage".to_string(), json!(20.0)),
                ]
                .into_iter()
                .collect(),
            )
            .await
            .unwrap();
        assert_eq!(result, "10");
    }

    #[tokio::test]
    async fn test_missing_argument() {
        let err = AddTool.execute(params(&[("a", 1.0)])).await.unwrap_err();
        assert!(err.to_string().contains("b"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(5.0), "5");
        assert_eq!(format_value(-3.0), "-3");
        assert_eq!(format_value(3.5), "3.5");
        assert_eq!(format_value(0.0), "0");
    }
}
