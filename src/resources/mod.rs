//! Fleet operations, one `impl ProxmoxClient` block per resource family.

mod nodes;
mod snapshots;
mod tasks;
mod vms;

use crate::{ProxmoxClient, ProxmoxResult, RequestError};
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

impl ProxmoxClient {
    pub(crate) async fn get<T>(&self, path: &str) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        let data = self.transport.request(Method::GET, path, None).await?;
        decode(path, data)
    }

    /// POSTs `body` as JSON. A unit body (`&()`) sends no payload.
    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> ProxmoxResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|e| RequestError::Encode {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let body = (!body.is_null()).then_some(body);

        let data = self.transport.request(Method::POST, path, body).await?;
        decode(path, data)
    }

    pub(crate) async fn delete<T>(&self, path: &str) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        let data = self.transport.request(Method::DELETE, path, None).await?;
        decode(path, data)
    }
}

fn decode<T>(path: &str, data: Value) -> ProxmoxResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(data).map_err(|e| {
        RequestError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}
