use crate::generator::{
    bookkeeping_tables, limit_size, render, ClickHouseSqlGenerator, CreateChangelogTable,
    Database, Generated, MarkChangeSetRan, SqlGenerator, TagDatabase, UpdateChangelogRow,
    UpdateChecksum, UpsertChangelogRow,
};
use crate::schema::ChangelogColumn;
use crate::template::changelog;
use crate::{ChlogError, ColumnValue, ColumnValueMap};

impl SqlGenerator<CreateChangelogTable> for ClickHouseSqlGenerator {
    fn generate_sql(
        &self,
        _statement: &CreateChangelogTable,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        let tables = bookkeeping_tables(database)?;
        let statement = changelog::create_changelog_table(&self.topology(), &tables);
        Ok(render(database, vec![statement]))
    }
}

impl SqlGenerator<UpdateChangelogRow> for ClickHouseSqlGenerator {
    fn generate_sql(
        &self,
        statement: &UpdateChangelogRow,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        let tables = bookkeeping_tables(database)?;
        let statement = changelog::update_changelog_row(&tables, &statement.id, &statement.values)?;
        Ok(render(database, vec![statement]))
    }
}

impl SqlGenerator<UpsertChangelogRow> for ClickHouseSqlGenerator {
    fn generate_sql(
        &self,
        statement: &UpsertChangelogRow,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        let tables = bookkeeping_tables(database)?;
        let statement = changelog::upsert_changelog_row(
            &self.topology(),
            &tables,
            &statement.id,
            &statement.values,
        )?;
        Ok(render(database, vec![statement]))
    }
}

impl SqlGenerator<UpdateChecksum> for ClickHouseSqlGenerator {
    fn generate_sql(
        &self,
        statement: &UpdateChecksum,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        let tables = bookkeeping_tables(database)?;
        let values =
            ColumnValueMap::new().with(ChangelogColumn::Md5Sum, statement.checksum.as_str());
        let statement = changelog::update_changelog_row(&tables, &statement.change_set_id, &values)?;
        Ok(render(database, vec![statement]))
    }
}

impl SqlGenerator<TagDatabase> for ClickHouseSqlGenerator {
    fn generate_sql(
        &self,
        statement: &TagDatabase,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        let tables = bookkeeping_tables(database)?;
        let statement = changelog::tag_latest_row(&self.topology(), &tables, &statement.tag)?;
        Ok(render(database, vec![statement]))
    }
}

impl SqlGenerator<MarkChangeSetRan> for ClickHouseSqlGenerator {
    /// First runs, failures and skips insert a new row through the host's
    /// default generator. Re-runs refresh the existing row in place.
    fn generate_sql(
        &self,
        statement: &MarkChangeSetRan,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        if !statement.exec_type.ran_before() {
            return Ok(Generated::UseDefault);
        }

        let run = &statement.run;
        let mut values = ColumnValueMap::new();
        values
            .set(
                ChangelogColumn::DateExecuted,
                ColumnValue::function(database.current_date_time_function()),
            )
            .set(ChangelogColumn::OrderExecuted, run.order_executed)
            .set(ChangelogColumn::Md5Sum, run.checksum.as_str())
            .set(ChangelogColumn::ExecType, statement.exec_type.as_str())
            .set(ChangelogColumn::DeploymentId, run.deployment_id.as_str())
            .set(
                ChangelogColumn::Comments,
                limit_size(run.comments.as_deref().unwrap_or_default().trim()),
            )
            .set(ChangelogColumn::ToolVersion, run.tool_version.as_str());
        let optional = [
            (ChangelogColumn::Contexts, run.contexts.clone()),
            (ChangelogColumn::Labels, run.labels.clone()),
            (
                ChangelogColumn::Description,
                run.description.as_deref().map(limit_size),
            ),
            (ChangelogColumn::Tag, run.tag.clone()),
        ];
        for (column, value) in optional {
            if let Some(value) = value {
                values.set(column, value);
            }
        }

        let tables = bookkeeping_tables(database)?;
        let statement = changelog::update_changelog_row(&tables, &run.id, &values)?;
        Ok(render(database, vec![statement]))
    }
}
