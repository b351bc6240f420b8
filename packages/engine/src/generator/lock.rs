use crate::generator::{
    bookkeeping_tables, render, ClickHouseSqlGenerator, CreateLockTable, Database, Generated,
    InitializeLockTable, LockChangelog, SelectLock, SqlGenerator, UnlockChangelog,
};
use crate::template::lock;
use crate::{ChlogError, ColumnValue};

impl SqlGenerator<CreateLockTable> for ClickHouseSqlGenerator {
    fn generate_sql(
        &self,
        _statement: &CreateLockTable,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        let tables = bookkeeping_tables(database)?;
        let statement = lock::create_lock_table(&self.topology(), &tables);
        Ok(render(database, vec![statement]))
    }
}

impl SqlGenerator<InitializeLockTable> for ClickHouseSqlGenerator {
    fn generate_sql(
        &self,
        _statement: &InitializeLockTable,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        let tables = bookkeeping_tables(database)?;
        let topology = self.topology();
        let statements = vec![
            lock::truncate_lock_table(&topology, &tables),
            lock::initial_lock_record(&topology, &tables),
        ];
        Ok(render(database, statements))
    }
}

impl SqlGenerator<LockChangelog> for ClickHouseSqlGenerator {
    fn generate_sql(
        &self,
        statement: &LockChangelog,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        let tables = bookkeeping_tables(database)?;
        let granted_at = ColumnValue::function(database.current_date_time_function());
        let statement = lock::lock(
            &self.topology(),
            &tables,
            &statement.owner.locked_by(),
            granted_at,
        );
        Ok(render(database, vec![statement]))
    }
}

impl SqlGenerator<UnlockChangelog> for ClickHouseSqlGenerator {
    fn generate_sql(
        &self,
        _statement: &UnlockChangelog,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        let tables = bookkeeping_tables(database)?;
        let statement = lock::unlock(&self.topology(), &tables);
        Ok(render(database, vec![statement]))
    }
}

impl SqlGenerator<SelectLock> for ClickHouseSqlGenerator {
    fn generate_sql(
        &self,
        statement: &SelectLock,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        let tables = bookkeeping_tables(database)?;
        let statement = lock::select_lock(&self.topology(), &tables, &statement.columns)?;
        Ok(render(database, vec![statement]))
    }
}
