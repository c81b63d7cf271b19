//! HTTP client for the admin service.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use streamwise_core::traits::{AdminService, StudentRecord};
use streamwise_core::ServiceError;

use crate::transport::Transport;

/// Admin endpoints: login, student listing, CSV export.
#[derive(Debug, Clone)]
pub struct HttpAdminClient {
    transport: Transport,
}

impl HttpAdminClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            transport: Transport::new(base_url, timeout),
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    password: &'a str,
}

#[async_trait]
impl AdminService for HttpAdminClient {
    #[instrument(skip_all)]
    async fn login(&self, password: &str) -> Result<(), ServiceError> {
        self.transport
            .send(
                self.transport
                    .client()
                    .post(self.transport.url("/api/admin/login"))
                    .json(&LoginRequest { password }),
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_students(&self) -> Result<Vec<StudentRecord>, ServiceError> {
        let response = self
            .transport
            .send(
                self.transport
                    .client()
                    .get(self.transport.url("/api/admin/students")),
            )
            .await?;

        let students: Vec<StudentRecord> = response.json().await.map_err(|e| {
            ServiceError::InvalidResponse(format!("failed to parse student list: {e}"))
        })?;
        debug!(count = students.len(), "fetched student records");
        Ok(students)
    }

    fn export_csv_url(&self) -> String {
        self.transport.url("/api/admin/export-csv")
    }

    #[instrument(skip(self))]
    async fn export_csv(&self) -> Result<Vec<u8>, ServiceError> {
        let response = self
            .transport
            .send(self.transport.client().get(self.export_csv_url()))
            .await?;
        self.transport.bytes(response).await
    }
}
