use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, FieldErrors};

fn single_error(field: &str, message: String) -> AppError {
    AppError::Validation(FieldErrors::from([(field.to_string(), message)]))
}

pub fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    let Json(body) = payload.map_err(|rejection| single_error("body", rejection.body_text()))?;
    if !body.is_object() {
        return Err(single_error("body", "must be a JSON object".to_string()));
    }
    Ok(body)
}

pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| single_error("query", rejection.body_text()))
}

fn lookup<'v>(body: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.')
        .try_fold(body, |node, key| node.get(key))
        .filter(|value| !value.is_null())
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn reject<T>(&mut self, field: &str, message: &str) -> Option<T> {
        self.errors.insert(field.to_string(), message.to_string());
        None
    }

    fn present<'v>(&mut self, body: &'v Value, path: &str) -> Option<&'v Value> {
        match lookup(body, path) {
            Some(value) => Some(value),
            None => self.reject(path, "is required"),
        }
    }

    pub fn object(&mut self, body: &Value, path: &str) -> bool {
        match self.present(body, path) {
            Some(value) if value.is_object() => true,
            Some(_) => {
                self.reject::<()>(path, "must be an object");
                false
            }
            None => false,
        }
    }

    pub fn text(&mut self, body: &Value, path: &str) -> Option<String> {
        match self.present(body, path)?.as_str() {
            Some(text) if !text.trim().is_empty() => Some(text.to_string()),
            Some(_) => self.reject(path, "must not be blank"),
            None => self.reject(path, "must be a string"),
        }
    }

    pub fn optional_text(&mut self, body: &Value, path: &str) -> Option<String> {
        match lookup(body, path)?.as_str() {
            Some(text) => Some(text.to_string()),
            None => self.reject(path, "must be a string"),
        }
    }

    pub fn positive(&mut self, body: &Value, path: &str) -> Option<f64> {
        match self.present(body, path)?.as_f64() {
            Some(number) if number > 0.0 => Some(number),
            Some(_) => self.reject(path, "must be positive"),
            None => self.reject(path, "must be a number"),
        }
    }

    pub fn positive_count(&mut self, body: &Value, path: &str) -> Option<u32> {
        match self.present(body, path)?.as_i64() {
            Some(count) => self.count(path, count),
            None => self.reject(path, "must be a whole number"),
        }
    }

    pub fn uuid(&mut self, body: &Value, path: &str) -> Option<Uuid> {
        match self.present(body, path)?.as_str().map(Uuid::parse_str) {
            Some(Ok(id)) => Some(id),
            _ => self.reject(path, "must be a UUID"),
        }
    }

    pub fn date_time(&mut self, body: &Value, path: &str) -> Option<NaiveDateTime> {
        match self
            .present(body, path)?
            .as_str()
            .map(str::parse::<NaiveDateTime>)
        {
            Some(Ok(at)) => Some(at),
            _ => self.reject(path, "must be a date-time like 2025-01-02T10:00:00"),
        }
    }

    pub fn optional_variant<T: DeserializeOwned>(
        &mut self,
        body: &Value,
        path: &str,
        expected: &str,
    ) -> Option<T> {
        match serde_json::from_value(lookup(body, path)?.clone()) {
            Ok(variant) => Some(variant),
            Err(_) => self.reject(path, expected),
        }
    }

    pub fn count_param(&mut self, field: &str, raw: Option<&str>, default: u32) -> Option<u32> {
        match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => Some(default),
            Some(raw) => match raw.parse::<i64>() {
                Ok(count) => self.count(field, count),
                Err(_) => self.reject(field, "must be a whole number"),
            },
        }
    }

    pub fn uuid_param(&mut self, field: &str, raw: Option<&str>) -> Option<Uuid> {
        match Uuid::parse_str(optional_text(raw)?) {
            Ok(id) => Some(id),
            Err(_) => self.reject(field, "must be a UUID"),
        }
    }

    pub fn variant_param<T: DeserializeOwned>(
        &mut self,
        field: &str,
        raw: Option<&str>,
        expected: &str,
    ) -> Option<T> {
        let raw = optional_text(raw)?;
        match serde_json::from_value(Value::String(raw.to_string())) {
            Ok(variant) => Some(variant),
            Err(_) => self.reject(field, expected),
        }
    }

    fn count(&mut self, field: &str, count: i64) -> Option<u32> {
        if count <= 0 {
            return self.reject(field, "must be positive");
        }
        match u32::try_from(count) {
            Ok(count) => Some(count),
            Err(_) => self.reject(field, "is too large"),
        }
    }

    pub fn finish<T>(self, value: Option<T>) -> Result<T, AppError> {
        if !self.errors.is_empty() {
            return Err(AppError::Validation(self.errors));
        }

        value.ok_or_else(|| AppError::Internal("validated request was incomplete".to_string()))
    }
}

pub fn optional_text(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
