use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Standard success envelope returned by every API route.
#[derive(Serialize, Debug)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { status: "success", message: None, data }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self { status: "success", message: Some(message.into()), data }
    }
}

/// Envelope for bulk inserts, which report a count instead of records.
#[derive(Serialize, Debug)]
pub struct CountResponse {
    pub status: &'static str,
    pub count: u64,
}

impl CountResponse {
    pub fn new(count: u64) -> Self {
        Self { status: "success", count }
    }
}
