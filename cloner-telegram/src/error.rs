//! Maps backend invocation errors onto [`ClientError`].

use cloner_core::ClientError;
use grammers_client::InvocationError;

/// `FLOOD_WAIT_N` (RPC 420) becomes [`ClientError::FloodWait`]; everything else is `Other`.
pub fn map_invocation_error(err: InvocationError) -> ClientError {
    match err {
        InvocationError::Rpc(rpc) if rpc.code == 420 || rpc.name.starts_with("FLOOD_WAIT") => {
            ClientError::FloodWait {
                seconds: rpc.value.map(u64::from).unwrap_or(0),
            }
        }
        other => ClientError::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammers_mtsender::RpcError;

    fn rpc(code: i32, name: &str, value: Option<u32>) -> InvocationError {
        InvocationError::Rpc(RpcError {
            code,
            name: name.into(),
            value,
            caused_by: None,
        })
    }

    #[test]
    fn test_flood_wait_carries_seconds() {
        let err = map_invocation_error(rpc(420, "FLOOD_WAIT", Some(31)));
        assert_eq!(err, ClientError::FloodWait { seconds: 31 });
    }

    #[test]
    fn test_flood_wait_without_value_waits_zero() {
        let err = map_invocation_error(rpc(420, "FLOOD_WAIT", None));
        assert_eq!(err, ClientError::FloodWait { seconds: 0 });
    }

    #[test]
    fn test_other_rpc_errors_are_not_rate_limits() {
        let err = map_invocation_error(rpc(400, "CHAT_WRITE_FORBIDDEN", None));
        assert!(matches!(err, ClientError::Other(msg) if msg.contains("CHAT_WRITE_FORBIDDEN")));
    }
}
