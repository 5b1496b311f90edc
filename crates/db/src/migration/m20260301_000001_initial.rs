//! Initial schema: branches, float accounts, chart of accounts, operational
//! transactions and the GL header/line tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(BRANCHES_SQL).await?;
        db.execute_unprepared(FLOAT_ACCOUNTS_SQL).await?;
        db.execute_unprepared(GL_ACCOUNTS_SQL).await?;
        db.execute_unprepared(SERVICE_TRANSACTIONS_SQL).await?;
        db.execute_unprepared(GL_TRANSACTIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const BRANCHES_SQL: &str = r"
CREATE TABLE branches (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(200) NOT NULL,
    location TEXT,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_branches_code UNIQUE (code)
);
";

const FLOAT_ACCOUNTS_SQL: &str = r"
CREATE TABLE float_accounts (
    id UUID PRIMARY KEY,
    branch_id UUID NOT NULL REFERENCES branches(id) ON DELETE RESTRICT,
    kind VARCHAR(32) NOT NULL,
    -- uppercase provider key, empty for cash in till and jumia
    provider VARCHAR(100) NOT NULL DEFAULT '',
    current_balance NUMERIC(19, 2) NOT NULL DEFAULT 0,
    min_threshold NUMERIC(19, 2) NOT NULL DEFAULT 0,
    max_threshold NUMERIC(19, 2),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    version BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_float_accounts_kind CHECK (
        kind IN ('cash_in_till', 'momo', 'agency_banking', 'e_zwich', 'power', 'jumia', 'bank')
    ),
    CONSTRAINT chk_float_accounts_balance_non_negative CHECK (current_balance >= 0),
    CONSTRAINT chk_float_accounts_thresholds CHECK (
        min_threshold >= 0 AND (max_threshold IS NULL OR max_threshold >= min_threshold)
    )
);

-- a deactivated account may be replaced by a new one for the same kind/provider
CREATE UNIQUE INDEX uq_float_accounts_active ON float_accounts(branch_id, kind, provider)
    WHERE is_active;
CREATE INDEX idx_float_accounts_branch ON float_accounts(branch_id, kind);
";

const GL_ACCOUNTS_SQL: &str = r"
CREATE TABLE gl_accounts (
    id UUID PRIMARY KEY,
    code VARCHAR(10) NOT NULL,
    name VARCHAR(100) NOT NULL,
    account_type VARCHAR(16) NOT NULL,
    balance NUMERIC(19, 2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_gl_accounts_code UNIQUE (code),
    CONSTRAINT chk_gl_accounts_type CHECK (
        account_type IN ('asset', 'liability', 'equity', 'revenue', 'expense')
    )
);
";

const SERVICE_TRANSACTIONS_SQL: &str = r"
CREATE TABLE service_transactions (
    id UUID PRIMARY KEY,
    branch_id UUID NOT NULL REFERENCES branches(id) ON DELETE RESTRICT,
    module VARCHAR(32) NOT NULL,
    kind VARCHAR(32) NOT NULL,
    provider VARCHAR(100) NOT NULL DEFAULT '',
    amount NUMERIC(19, 2) NOT NULL,
    fee NUMERIC(19, 2) NOT NULL DEFAULT 0,
    customer_name VARCHAR(200),
    phone_number VARCHAR(20),
    reference VARCHAR(100),
    expense_category VARCHAR(32),
    source_float_account_id UUID REFERENCES float_accounts(id),
    destination_float_account_id UUID REFERENCES float_accounts(id),
    float_movements JSONB NOT NULL DEFAULT '[]'::jsonb,
    status VARCHAR(16) NOT NULL DEFAULT 'completed',
    transaction_date DATE NOT NULL,
    performed_by UUID NOT NULL,
    reversed_at TIMESTAMPTZ,
    reversed_by UUID,
    reversal_reason TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_service_transactions_amount CHECK (amount > 0),
    CONSTRAINT chk_service_transactions_fee CHECK (fee >= 0),
    CONSTRAINT chk_service_transactions_status CHECK (status IN ('completed', 'reversed'))
);

-- a reference can be posted once per branch
CREATE UNIQUE INDEX uq_service_transactions_reference
    ON service_transactions(branch_id, reference) WHERE reference IS NOT NULL;

CREATE INDEX idx_service_transactions_branch_date
    ON service_transactions(branch_id, transaction_date DESC, created_at DESC);

CREATE INDEX idx_service_transactions_module
    ON service_transactions(branch_id, module, status);
";

const GL_TRANSACTIONS_SQL: &str = r"
CREATE TABLE gl_transactions (
    id UUID PRIMARY KEY,
    branch_id UUID NOT NULL REFERENCES branches(id) ON DELETE RESTRICT,
    source_module VARCHAR(32) NOT NULL,
    source_transaction_id UUID NOT NULL REFERENCES service_transactions(id),
    transaction_date DATE NOT NULL,
    description TEXT NOT NULL,
    reference VARCHAR(100),
    total_debit NUMERIC(19, 2) NOT NULL,
    total_credit NUMERIC(19, 2) NOT NULL,
    is_reversal BOOLEAN NOT NULL DEFAULT FALSE,
    reversal_of UUID REFERENCES gl_transactions(id),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_gl_transactions_source UNIQUE (source_module, source_transaction_id, is_reversal),
    CONSTRAINT chk_gl_transactions_balanced CHECK (abs(total_debit - total_credit) <= 0.01),
    CONSTRAINT chk_gl_transactions_reversal CHECK (is_reversal = (reversal_of IS NOT NULL))
);

CREATE INDEX idx_gl_transactions_branch_date ON gl_transactions(branch_id, transaction_date);

CREATE TABLE gl_journal_entries (
    id UUID PRIMARY KEY,
    gl_transaction_id UUID NOT NULL REFERENCES gl_transactions(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES gl_accounts(id),
    account_code VARCHAR(10) NOT NULL,
    debit NUMERIC(19, 2) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 2) NOT NULL DEFAULT 0,
    description TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_gl_journal_entries_line UNIQUE (gl_transaction_id, line_no),
    -- exactly one side is set
    CONSTRAINT chk_gl_journal_entries_one_side CHECK (
        (debit > 0 AND credit = 0) OR (credit > 0 AND debit = 0)
    )
);

CREATE INDEX idx_gl_journal_entries_account ON gl_journal_entries(account_id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS gl_journal_entries CASCADE;
DROP TABLE IF EXISTS gl_transactions CASCADE;
DROP TABLE IF EXISTS service_transactions CASCADE;
DROP TABLE IF EXISTS gl_accounts CASCADE;
DROP TABLE IF EXISTS float_accounts CASCADE;
DROP TABLE IF EXISTS branches CASCADE;
";
