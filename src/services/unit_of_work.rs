use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

/// All writes of one request, applied together or not at all.
///
/// Wraps a database transaction. Callers finish it with [`UnitOfWork::commit`] or
/// [`UnitOfWork::rollback`]; a unit dropped without either is rolled back by the
/// underlying transaction, so early returns never leave partial writes behind.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    pub async fn begin(conn: &DatabaseConnection) -> Result<Self, DbErr> {
        let txn = conn.begin().await?;
        Ok(Self { txn })
    }

    /// Connection to run reads and writes through while the unit is open.
    pub fn conn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}
