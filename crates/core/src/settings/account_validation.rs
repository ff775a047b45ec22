//! Pre-flight check of the configured account.

use log::{info, warn};

use powerwatch_source::{FailureKind, PowerDataSource};

use crate::errors::{Error, Result};

/// Confirms the account exists before polling starts.
///
/// A server that answers but rejects the account yields
/// [`Error::InvalidAccount`]; a server that cannot be reached yields
/// [`Error::Source`].
pub async fn validate_account(source: &dyn PowerDataSource) -> Result<()> {
    let cons_no = source.account().cons_no.clone();
    match source.validate_connection().await {
        Ok(true) => {
            info!("Account {} validated", cons_no);
            Ok(())
        }
        Ok(false) => Err(Error::InvalidAccount(cons_no)),
        Err(err) if err.kind() == FailureKind::Logical => {
            warn!("Account {} rejected: {}", cons_no, err);
            Err(Error::InvalidAccount(cons_no))
        }
        Err(err) => Err(Error::Source(err)),
    }
}
