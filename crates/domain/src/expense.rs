use rust_decimal::Decimal;
use sea_query::{Alias, Expr, Func, Iden, Order, PostgresQueryBuilder, Query, SelectStatement};
use sea_query_binder::SqlxBinder;
use sqlx::{Executor, FromRow, PgConnection, Postgres};
use time::{Date, OffsetDateTime};

use crate::pagination::{Page, PageRequest, SortDirection};
use crate::DomainError;

/// Schema definition for the expenses table
#[derive(Iden, Clone, Copy)]
pub enum Expenses {
    Table,
    Id,
    UserId,
    Amount,
    Category,
    Date,
    Description,
    CreatedAt,
}

/// Columns of the users table needed to project the owner's name
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
}

/// Expense category enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Leisure,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "FOOD",
            ExpenseCategory::Transport => "TRANSPORT",
            ExpenseCategory::Leisure => "LEISURE",
            ExpenseCategory::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FOOD" => Some(ExpenseCategory::Food),
            "TRANSPORT" => Some(ExpenseCategory::Transport),
            "LEISURE" => Some(ExpenseCategory::Leisure),
            "OTHER" => Some(ExpenseCategory::Other),
            _ => None,
        }
    }
}

impl From<ExpenseCategory> for sea_query::Value {
    fn from(category: ExpenseCategory) -> Self {
        category.as_str().into()
    }
}

/// Raw expense row joined with its owner's name
#[derive(Debug, Clone, FromRow)]
struct ExpenseRow {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub category: String,
    pub date: Date,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub user_name: String,
}

/// Expense entity, as read back with the owner's current name
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub date: Date,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = DomainError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        let category = ExpenseCategory::parse(&row.category).ok_or_else(|| {
            DomainError::InvalidData(format!(
                "expense {} has unknown category {:?}",
                row.id, row.category
            ))
        })?;

        Ok(Expense {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            amount: row.amount,
            category,
            date: row.date,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

/// The mutable fields of an expense
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFields {
    pub user_id: i64,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub date: Date,
    pub description: Option<String>,
}

/// An expense that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub fields: ExpenseFields,
    pub created_at: OffsetDateTime,
}

impl NewExpense {
    /// Stamp a new expense with the current time
    pub fn new(fields: ExpenseFields) -> Self {
        Self {
            fields,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Column an expense listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpenseSortField {
    Id,
    UserId,
    Amount,
    Category,
    #[default]
    Date,
    Description,
    CreatedAt,
}

impl ExpenseSortField {
    /// Accepts the camelCase API name or the snake_case column name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "id" => Some(ExpenseSortField::Id),
            "userId" | "user_id" => Some(ExpenseSortField::UserId),
            "amount" => Some(ExpenseSortField::Amount),
            "category" => Some(ExpenseSortField::Category),
            "date" => Some(ExpenseSortField::Date),
            "description" => Some(ExpenseSortField::Description),
            "createdAt" | "created_at" => Some(ExpenseSortField::CreatedAt),
            _ => None,
        }
    }

    fn column(self) -> Expenses {
        match self {
            ExpenseSortField::Id => Expenses::Id,
            ExpenseSortField::UserId => Expenses::UserId,
            ExpenseSortField::Amount => Expenses::Amount,
            ExpenseSortField::Category => Expenses::Category,
            ExpenseSortField::Date => Expenses::Date,
            ExpenseSortField::Description => Expenses::Description,
            ExpenseSortField::CreatedAt => Expenses::CreatedAt,
        }
    }
}

/// Ordering for expense listings; defaults to newest date first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpenseSort {
    pub field: ExpenseSortField,
    pub direction: SortDirection,
}

impl ExpenseSort {
    pub fn new(field: ExpenseSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Newest date first
    pub fn by_date_desc() -> Self {
        Self::default()
    }

    /// Apply the ordering, breaking ties by id so paging is stable
    fn apply(&self, query: &mut SelectStatement) {
        let order: Order = self.direction.into();
        query.order_by((Expenses::Table, self.field.column()), order.clone());
        if self.field != ExpenseSortField::Id {
            query.order_by((Expenses::Table, Expenses::Id), order);
        }
    }
}

/// Inclusive range of calendar dates. An inverted range matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }
}

/// Restrictions applied to an expense scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub user_id: Option<i64>,
    pub date_range: Option<DateRange>,
}

impl ExpenseFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    fn apply(&self, query: &mut SelectStatement) {
        if let Some(user_id) = self.user_id {
            query.and_where(Expr::col((Expenses::Table, Expenses::UserId)).eq(user_id));
        }
        if let Some(range) = self.date_range {
            query.and_where(
                Expr::col((Expenses::Table, Expenses::Date)).between(range.start, range.end),
            );
        }
    }
}

/// Base select joining each expense with its owner's name
fn select_expenses() -> SelectStatement {
    Query::select()
        .columns([
            (Expenses::Table, Expenses::Id),
            (Expenses::Table, Expenses::UserId),
            (Expenses::Table, Expenses::Amount),
            (Expenses::Table, Expenses::Category),
            (Expenses::Table, Expenses::Date),
            (Expenses::Table, Expenses::Description),
            (Expenses::Table, Expenses::CreatedAt),
        ])
        .expr_as(Expr::col((Users::Table, Users::Name)), Alias::new("user_name"))
        .from(Expenses::Table)
        .inner_join(
            Users::Table,
            Expr::col((Expenses::Table, Expenses::UserId)).equals((Users::Table, Users::Id)),
        )
        .to_owned()
}

fn decode_rows(rows: Vec<ExpenseRow>) -> Result<Vec<Expense>, DomainError> {
    rows.into_iter().map(Expense::try_from).collect()
}

/// Repository for Expense operations
pub struct ExpenseRepository;

impl ExpenseRepository {
    /// Insert a new expense, returning its ID
    pub async fn create<'e, E>(executor: E, expense: &NewExpense) -> Result<i64, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fields = &expense.fields;

        let (sql, values) = Query::insert()
            .into_table(Expenses::Table)
            .columns([
                Expenses::UserId,
                Expenses::Amount,
                Expenses::Category,
                Expenses::Date,
                Expenses::Description,
                Expenses::CreatedAt,
            ])
            .values_panic([
                fields.user_id.into(),
                fields.amount.into(),
                fields.category.into(),
                fields.date.into(),
                fields.description.clone().into(),
                expense.created_at.into(),
            ])
            .returning_col(Expenses::Id)
            .build_sqlx(PostgresQueryBuilder);

        let id = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(executor)
            .await?;

        Ok(id)
    }

    /// Find an expense by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Expense>, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (sql, values) = select_expenses()
            .and_where(Expr::col((Expenses::Table, Expenses::Id)).eq(id))
            .build_sqlx(PostgresQueryBuilder);

        let row = sqlx::query_as_with::<_, ExpenseRow, _>(&sql, values)
            .fetch_optional(executor)
            .await?;

        row.map(Expense::try_from).transpose()
    }

    /// Count the expenses matching a filter
    pub async fn count<'e, E>(executor: E, filter: &ExpenseFilter) -> Result<u64, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query = Query::select()
            .expr(Func::count(Expr::col((Expenses::Table, Expenses::Id))))
            .from(Expenses::Table)
            .to_owned();
        filter.apply(&mut query);
        let (sql, values) = query.build_sqlx(PostgresQueryBuilder);

        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(executor)
            .await?;

        u64::try_from(count).map_err(|_| DomainError::InvalidData(format!("negative count {count}")))
    }

    /// Fetch one page of the expenses matching a filter
    pub async fn find_page(
        conn: &mut PgConnection,
        filter: &ExpenseFilter,
        sort: ExpenseSort,
        request: PageRequest,
    ) -> Result<Page<Expense>, DomainError> {
        let total = Self::count(&mut *conn, filter).await?;
        if request.offset() >= total {
            return Ok(Page::new(Vec::new(), request, total));
        }

        let mut query = select_expenses();
        filter.apply(&mut query);
        sort.apply(&mut query);
        query.limit(request.limit()).offset(request.offset());
        let (sql, values) = query.build_sqlx(PostgresQueryBuilder);

        let rows = sqlx::query_as_with::<_, ExpenseRow, _>(&sql, values)
            .fetch_all(&mut *conn)
            .await?;

        Ok(Page::new(decode_rows(rows)?, request, total))
    }

    /// List every expense matching a filter, newest date first
    pub async fn list<'e, E>(executor: E, filter: &ExpenseFilter) -> Result<Vec<Expense>, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut query = select_expenses();
        filter.apply(&mut query);
        ExpenseSort::by_date_desc().apply(&mut query);
        let (sql, values) = query.build_sqlx(PostgresQueryBuilder);

        let rows = sqlx::query_as_with::<_, ExpenseRow, _>(&sql, values)
            .fetch_all(executor)
            .await?;

        decode_rows(rows)
    }

    /// Overwrite every mutable field of an expense
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        fields: &ExpenseFields,
    ) -> Result<bool, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (sql, values) = Query::update()
            .table(Expenses::Table)
            .values([
                (Expenses::UserId, fields.user_id.into()),
                (Expenses::Amount, fields.amount.into()),
                (Expenses::Category, fields.category.into()),
                (Expenses::Date, fields.date.into()),
                (Expenses::Description, fields.description.clone().into()),
            ])
            .and_where(Expr::col(Expenses::Id).eq(id))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(executor).await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an expense
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (sql, values) = Query::delete()
            .from_table(Expenses::Table)
            .and_where(Expr::col(Expenses::Id).eq(id))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(executor).await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every expense owned by a user, returning how many were removed
    pub async fn delete_by_user<'e, E>(executor: E, user_id: i64) -> Result<u64, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (sql, values) = Query::delete()
            .from_table(Expenses::Table)
            .and_where(Expr::col(Expenses::UserId).eq(user_id))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(executor).await?;

        Ok(result.rows_affected())
    }
}
