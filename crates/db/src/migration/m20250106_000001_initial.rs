//! Initial database migration.
//!
//! Creates the school, billing and identifier tables, the line item
//! consistency trigger, and tenant RLS policies.

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
        // PART 2: SCHOOL STRUCTURE
        // ============================================================
        db.execute_unprepared(TENANTS_SQL).await?;
        db.execute_unprepared(ACADEMIC_TERMS_SQL).await?;
        db.execute_unprepared(GRADES_SQL).await?;

        // ============================================================
        // PART 3: PEOPLE
        // ============================================================
        db.execute_unprepared(GUARDIANS_SQL).await?;
        db.execute_unprepared(STUDENTS_SQL).await?;
        db.execute_unprepared(EMPLOYEES_SQL).await?;

        // ============================================================
        // PART 4: FEES & INVOICES
        // ============================================================
        db.execute_unprepared(FEE_CATEGORIES_SQL).await?;
        db.execute_unprepared(GUARDIAN_FEE_ADJUSTMENTS_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INVOICE_LINE_ITEMS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 6: ROW-LEVEL SECURITY
        // ============================================================
        db.execute_unprepared(RLS_SQL).await?;

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
CREATE TYPE payment_plan AS ENUM ('full', 'half_half', 'monthly');
CREATE TYPE invoice_status AS ENUM ('unpaid', 'partially_paid', 'paid');
CREATE TYPE adjustment_type AS ENUM ('exclude', 'custom_amount');
";

const TENANTS_SQL: &str = r"
CREATE TABLE tenants (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    slug VARCHAR(100) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACADEMIC_TERMS_SQL: &str = r"
CREATE TABLE academic_terms (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    term_number SMALLINT NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_term_dates CHECK (end_date >= start_date),
    CONSTRAINT chk_term_number CHECK (term_number > 0),
    UNIQUE (tenant_id, name)
);

CREATE INDEX idx_academic_terms_tenant ON academic_terms(tenant_id, start_date);
";

const GRADES_SQL: &str = r"
CREATE TABLE grades (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (tenant_id, name)
);
";

const GUARDIANS_SQL: &str = r"
CREATE TABLE guardians (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    guardian_number VARCHAR(50) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    phone VARCHAR(50),
    email VARCHAR(255),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_guardians_tenant_number UNIQUE (tenant_id, guardian_number)
);

CREATE INDEX idx_guardians_tenant_active ON guardians(tenant_id) WHERE is_active;
";

const STUDENTS_SQL: &str = r"
CREATE TABLE students (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    guardian_id UUID NOT NULL REFERENCES guardians(id) ON DELETE RESTRICT,
    grade_id UUID NOT NULL REFERENCES grades(id) ON DELETE RESTRICT,
    admission_number VARCHAR(50) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_students_tenant_admission UNIQUE (tenant_id, admission_number)
);

CREATE INDEX idx_students_guardian ON students(guardian_id) WHERE is_active;
";

const EMPLOYEES_SQL: &str = r"
CREATE TABLE employees (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    employee_number VARCHAR(50) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_employees_tenant_number UNIQUE (tenant_id, employee_number)
);
";

const FEE_CATEGORIES_SQL: &str = r"
CREATE TABLE fee_categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    grade_id UUID NOT NULL REFERENCES grades(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    amount NUMERIC(12, 2) NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_fee_amount CHECK (amount >= 0),
    UNIQUE (grade_id, name)
);

CREATE INDEX idx_fee_categories_grade ON fee_categories(grade_id, sort_order) WHERE is_active;
";

const GUARDIAN_FEE_ADJUSTMENTS_SQL: &str = r"
CREATE TABLE guardian_fee_adjustments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    guardian_id UUID NOT NULL REFERENCES guardians(id) ON DELETE CASCADE,
    academic_term_id UUID NOT NULL REFERENCES academic_terms(id) ON DELETE CASCADE,
    category_name VARCHAR(100) NOT NULL,
    adjustment_type adjustment_type NOT NULL,
    custom_amount NUMERIC(12, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_custom_amount CHECK (
        (adjustment_type = 'exclude' AND custom_amount IS NULL) OR
        (adjustment_type = 'custom_amount' AND custom_amount IS NOT NULL AND custom_amount >= 0)
    ),
    UNIQUE (guardian_id, academic_term_id, category_name)
);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    guardian_id UUID NOT NULL REFERENCES guardians(id) ON DELETE RESTRICT,
    academic_term_id UUID NOT NULL REFERENCES academic_terms(id) ON DELETE RESTRICT,
    invoice_number VARCHAR(50) NOT NULL,
    invoice_date DATE NOT NULL,
    due_date DATE NOT NULL,
    payment_plan payment_plan NOT NULL DEFAULT 'full',
    subtotal NUMERIC(12, 2) NOT NULL DEFAULT 0,
    discount NUMERIC(12, 2) NOT NULL DEFAULT 0,
    total NUMERIC(12, 2) NOT NULL DEFAULT 0,
    amount_paid NUMERIC(12, 2) NOT NULL DEFAULT 0,
    balance_due NUMERIC(12, 2) NOT NULL DEFAULT 0,
    status invoice_status NOT NULL DEFAULT 'unpaid',
    notes TEXT,
    generated_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_invoice_due_date CHECK (due_date >= invoice_date),
    CONSTRAINT chk_invoice_discount CHECK (discount >= 0 AND discount <= subtotal),
    CONSTRAINT chk_invoice_total CHECK (total = subtotal - discount),
    CONSTRAINT chk_invoice_balance CHECK (balance_due = total - amount_paid),
    CONSTRAINT uq_invoices_tenant_number UNIQUE (tenant_id, invoice_number),
    CONSTRAINT uq_invoices_guardian_term UNIQUE (guardian_id, academic_term_id)
);

CREATE INDEX idx_invoices_term ON invoices(tenant_id, academic_term_id);
CREATE INDEX idx_invoices_unpaid ON invoices(tenant_id, due_date) WHERE status <> 'paid';
";

const INVOICE_LINE_ITEMS_SQL: &str = r"
CREATE TABLE invoice_line_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE RESTRICT,
    student_name VARCHAR(255) NOT NULL,
    grade_name VARCHAR(100) NOT NULL,
    -- Ordered [category, amount] pairs; JSONB objects would re-sort the keys
    fee_breakdown JSONB NOT NULL DEFAULT '[]'::jsonb,
    total_amount NUMERIC(12, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_line_item_total CHECK (total_amount >= 0),
    CONSTRAINT chk_fee_breakdown_pairs CHECK (jsonb_typeof(fee_breakdown) = 'array'),
    UNIQUE (invoice_id, student_id)
);

CREATE INDEX idx_invoice_line_items_invoice ON invoice_line_items(invoice_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_line_item_total
-- Ensures total_amount equals the sum of the fee breakdown
-- ============================================================
CREATE OR REPLACE FUNCTION check_line_item_total()
RETURNS TRIGGER AS $$
DECLARE
    breakdown_total NUMERIC(12, 2);
BEGIN
    SELECT COALESCE(SUM((pair->>1)::NUMERIC), 0)
    INTO breakdown_total
    FROM jsonb_array_elements(NEW.fee_breakdown) AS pair;

    IF breakdown_total <> NEW.total_amount THEN
        RAISE EXCEPTION 'Line item total % does not match fee breakdown total %',
            NEW.total_amount, breakdown_total;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_check_line_item_total
    BEFORE INSERT OR UPDATE ON invoice_line_items
    FOR EACH ROW EXECUTE FUNCTION check_line_item_total();
";

const RLS_SQL: &str = r"
ALTER TABLE academic_terms ENABLE ROW LEVEL SECURITY;
ALTER TABLE grades ENABLE ROW LEVEL SECURITY;
ALTER TABLE guardians ENABLE ROW LEVEL SECURITY;
ALTER TABLE students ENABLE ROW LEVEL SECURITY;
ALTER TABLE employees ENABLE ROW LEVEL SECURITY;
ALTER TABLE fee_categories ENABLE ROW LEVEL SECURITY;
ALTER TABLE guardian_fee_adjustments ENABLE ROW LEVEL SECURITY;
ALTER TABLE invoices ENABLE ROW LEVEL SECURITY;
ALTER TABLE invoice_line_items ENABLE ROW LEVEL SECURITY;

ALTER TABLE academic_terms FORCE ROW LEVEL SECURITY;
ALTER TABLE grades FORCE ROW LEVEL SECURITY;
ALTER TABLE guardians FORCE ROW LEVEL SECURITY;
ALTER TABLE students FORCE ROW LEVEL SECURITY;
ALTER TABLE employees FORCE ROW LEVEL SECURITY;
ALTER TABLE fee_categories FORCE ROW LEVEL SECURITY;
ALTER TABLE guardian_fee_adjustments FORCE ROW LEVEL SECURITY;
ALTER TABLE invoices FORCE ROW LEVEL SECURITY;
ALTER TABLE invoice_line_items FORCE ROW LEVEL SECURITY;

CREATE POLICY tenant_isolation ON academic_terms
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
CREATE POLICY tenant_isolation ON grades
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
CREATE POLICY tenant_isolation ON guardians
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
CREATE POLICY tenant_isolation ON students
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
CREATE POLICY tenant_isolation ON employees
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
CREATE POLICY tenant_isolation ON fee_categories
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
CREATE POLICY tenant_isolation ON guardian_fee_adjustments
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
CREATE POLICY tenant_isolation ON invoices
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
CREATE POLICY tenant_isolation ON invoice_line_items
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TRIGGER IF EXISTS trg_check_line_item_total ON invoice_line_items;
DROP FUNCTION IF EXISTS check_line_item_total();

DROP TABLE IF EXISTS invoice_line_items CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS guardian_fee_adjustments CASCADE;
DROP TABLE IF EXISTS fee_categories CASCADE;
DROP TABLE IF EXISTS employees CASCADE;
DROP TABLE IF EXISTS students CASCADE;
DROP TABLE IF EXISTS guardians CASCADE;
DROP TABLE IF EXISTS grades CASCADE;
DROP TABLE IF EXISTS academic_terms CASCADE;
DROP TABLE IF EXISTS tenants CASCADE;

DROP TYPE IF EXISTS adjustment_type;
DROP TYPE IF EXISTS invoice_status;
DROP TYPE IF EXISTS payment_plan;
";
