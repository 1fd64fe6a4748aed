use crate::args::ResetArgs;
use crate::commands::Out;
use crate::error::{Error, ErrorType};
use crate::session::Session;
use crate::Result;

/// Deletes all transactions and settings. Refuses to do anything unless `args.yes()`.
pub async fn reset(session: &mut Session, args: &ResetArgs) -> Result<Out<()>> {
    if !args.yes() {
        return Err(Error::msg(
            ErrorType::Validation,
            "This deletes all transactions and settings. Pass --yes to confirm",
        ));
    }
    let count = session.ledger().len();
    session.reset_all().await?;
    Ok(format!("Deleted {count} transactions and the settings").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionType;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_reset_requires_confirmation() {
        let env = TestEnv::new().await;
        let mut session = env.session().await;
        session
            .add("1", TransactionType::Income, "a")
            .await
            .unwrap();

        let err = reset(&mut session, &ResetArgs::new(false)).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(env.session().await.ledger().len(), 1);

        let out = reset(&mut session, &ResetArgs::new(true)).await.unwrap();
        assert_eq!(out.message(), "Deleted 1 transactions and the settings");
        assert!(env.session().await.ledger().is_empty());
    }
}
