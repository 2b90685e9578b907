use anyhow::{Context as AnyhowContext, Result};
use std::net::SocketAddr;

/// Environment fallback for `serve --bind`
pub(crate) const BIND_ENV: &str = "PAGE_RANK_DECODER_BIND";

pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:8050";

/// `--bind` flag, then `PAGE_RANK_DECODER_BIND`, then the loopback default
pub(crate) fn resolve_bind(flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| {
            std::env::var(BIND_ENV)
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_BIND.to_string())
}

pub(crate) async fn resolve_guarded_bind_addrs(
    bind: &str,
    public: bool,
) -> Result<Vec<SocketAddr>> {
    let addrs = resolve_bind_addrs(bind).await?;
    enforce_bind_guard_for_addrs(bind, &addrs, public)?;
    Ok(addrs)
}

async fn resolve_bind_addrs(bind: &str) -> Result<Vec<SocketAddr>> {
    // Prefer resolving via Tokio so "localhost" behaves as expected.
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(bind)
        .await
        .with_context(|| format!("Failed to resolve bind address: {bind}"))?
        .collect();

    if addrs.is_empty() {
        anyhow::bail!("Bind address resolved to zero socket addrs: {bind}")
    }
    Ok(addrs)
}

fn enforce_bind_guard_for_addrs(bind: &str, addrs: &[SocketAddr], public: bool) -> Result<()> {
    let any_non_loopback = addrs.iter().any(|addr| !addr.ip().is_loopback());
    if any_non_loopback && !public {
        anyhow::bail!(
            "Refusing to bind to non-loopback address without --public: {bind}. The form has no authentication; pass --public only on a trusted network."
        )
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_bind_flag_wins() {
        assert_eq!(resolve_bind(Some("127.0.0.1:9000")), "127.0.0.1:9000");
    }

    #[tokio::test]
    async fn bind_guard_requires_public_for_non_loopback() {
        resolve_guarded_bind_addrs("127.0.0.1:0", false)
            .await
            .unwrap();

        assert!(resolve_guarded_bind_addrs("0.0.0.0:0", false)
            .await
            .is_err());
        resolve_guarded_bind_addrs("0.0.0.0:0", true).await.unwrap();
    }
}
