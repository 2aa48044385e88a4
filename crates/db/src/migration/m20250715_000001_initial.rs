//! Initial database migration.
//!
//! Creates the enums, tables, indexes, and triggers for the billing engine.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: ROSTER TABLES
        // ============================================================
        db.execute_unprepared(CLASS_GROUPS_SQL).await?;
        db.execute_unprepared(STUDENTS_SQL).await?;
        db.execute_unprepared(GUARDIANS_SQL).await?;

        // ============================================================
        // PART 3: FEE SCHEDULES
        // ============================================================
        db.execute_unprepared(FEE_SCHEDULES_SQL).await?;

        // ============================================================
        // PART 4: INVOICES
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;

        // ============================================================
        // PART 5: NOTIFICATIONS
        // ============================================================
        db.execute_unprepared(NOTIFICATIONS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Enrollment status
CREATE TYPE student_status AS ENUM ('active', 'inactive');

-- Invoice payment status
CREATE TYPE invoice_status AS ENUM ('pending', 'paid');
";

const CLASS_GROUPS_SQL: &str = r"
CREATE TABLE class_groups (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    level_code VARCHAR(20) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const STUDENTS_SQL: &str = r"
CREATE TABLE students (
    id UUID PRIMARY KEY,
    name VARCHAR(200) NOT NULL,
    level_code VARCHAR(20) NOT NULL,
    join_date DATE NOT NULL,
    end_date DATE,
    is_trial BOOLEAN NOT NULL DEFAULT FALSE,
    status student_status NOT NULL DEFAULT 'active',
    class_group_id UUID REFERENCES class_groups(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_students_status ON students(status);
CREATE INDEX idx_students_level_code ON students(level_code);
";

const GUARDIANS_SQL: &str = r"
CREATE TABLE guardians (
    id UUID PRIMARY KEY,
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    name VARCHAR(200) NOT NULL,
    phone VARCHAR(30),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_guardians_student_id ON guardians(student_id);
";

const FEE_SCHEDULES_SQL: &str = r"
CREATE TABLE fee_schedules (
    id UUID PRIMARY KEY,
    month SMALLINT NOT NULL CHECK (month BETWEEN 1 AND 12),
    year INTEGER NOT NULL,
    trial_discount_percent NUMERIC(5, 2) NOT NULL DEFAULT 0
        CHECK (trial_discount_percent BETWEEN 0 AND 100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_fee_schedules_period UNIQUE (month, year)
);

CREATE TABLE fee_schedule_levels (
    id UUID PRIMARY KEY,
    fee_schedule_id UUID NOT NULL REFERENCES fee_schedules(id) ON DELETE CASCADE,
    level_code VARCHAR(20) NOT NULL,
    amount NUMERIC(14, 0) NOT NULL CHECK (amount > 0),
    sort_order SMALLINT NOT NULL DEFAULT 0,

    CONSTRAINT uq_fee_schedule_levels UNIQUE (fee_schedule_id, level_code)
);

CREATE TABLE fee_schedule_extras (
    id UUID PRIMARY KEY,
    fee_schedule_id UUID NOT NULL REFERENCES fee_schedules(id) ON DELETE CASCADE,
    fee_key VARCHAR(50) NOT NULL,
    name VARCHAR(200) NOT NULL,
    amount NUMERIC(14, 0) NOT NULL CHECK (amount > 0),
    sort_order SMALLINT NOT NULL DEFAULT 0,

    CONSTRAINT uq_fee_schedule_extras UNIQUE (fee_schedule_id, fee_key)
);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    student_id UUID NOT NULL REFERENCES students(id),
    month SMALLINT NOT NULL CHECK (month BETWEEN 1 AND 12),
    year INTEGER NOT NULL,
    level_code VARCHAR(20) NOT NULL,
    is_trial BOOLEAN NOT NULL DEFAULT FALSE,
    study_days INTEGER NOT NULL CHECK (study_days > 0),
    total_amount NUMERIC(14, 0) NOT NULL,
    status invoice_status NOT NULL DEFAULT 'pending',
    paid_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Safety net only: the billing run checks for an existing invoice
    -- before computing anything for a student.
    CONSTRAINT uq_invoices_student_period UNIQUE (student_id, month, year)
);

CREATE INDEX idx_invoices_period ON invoices(year, month);
CREATE INDEX idx_invoices_status ON invoices(status);

CREATE TABLE invoice_items (
    id UUID PRIMARY KEY,
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    item_key VARCHAR(50) NOT NULL,
    name VARCHAR(200) NOT NULL,
    amount NUMERIC(14, 0) NOT NULL,
    sort_order SMALLINT NOT NULL DEFAULT 0
);

CREATE INDEX idx_invoice_items_invoice_id ON invoice_items(invoice_id);
";

const NOTIFICATIONS_SQL: &str = r"
CREATE TABLE notifications (
    id UUID PRIMARY KEY,
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    guardian_id UUID NOT NULL REFERENCES guardians(id) ON DELETE CASCADE,
    message TEXT NOT NULL,
    is_read BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_notifications_guardian_id ON notifications(guardian_id);
CREATE INDEX idx_notifications_invoice_id ON notifications(invoice_id);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_class_groups_updated_at
    BEFORE UPDATE ON class_groups
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_students_updated_at
    BEFORE UPDATE ON students
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_guardians_updated_at
    BEFORE UPDATE ON guardians
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_fee_schedules_updated_at
    BEFORE UPDATE ON fee_schedules
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_invoices_updated_at
    BEFORE UPDATE ON invoices
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS notifications CASCADE;
DROP TABLE IF EXISTS invoice_items CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS fee_schedule_extras CASCADE;
DROP TABLE IF EXISTS fee_schedule_levels CASCADE;
DROP TABLE IF EXISTS fee_schedules CASCADE;
DROP TABLE IF EXISTS guardians CASCADE;
DROP TABLE IF EXISTS students CASCADE;
DROP TABLE IF EXISTS class_groups CASCADE;
DROP FUNCTION IF EXISTS set_updated_at CASCADE;
DROP TYPE IF EXISTS invoice_status CASCADE;
DROP TYPE IF EXISTS student_status CASCADE;
";
