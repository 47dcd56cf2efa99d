use chrono::{DateTime, Utc};
use intake_core::models::{
    ApplicantProfile, DocumentBuckets, FileRecord, NewSubmission, Provenance, Submission,
};
use intake_core::AppError;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

/// Flat row shape of the `submissions` table.
#[derive(Debug, FromRow)]
struct SubmissionRow {
    id: Uuid,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    street: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
    country: Option<String>,
    tax_number: Option<String>,
    vat_id: Option<String>,
    iban: Option<String>,
    bic: Option<String>,
    hourly_rate: Option<f64>,
    travel_rate: Option<f64>,
    identity_document: Json<Vec<FileRecord>>,
    residency_proof: Json<Vec<FileRecord>>,
    qualifications: Json<Vec<FileRecord>>,
    business_permit: Json<Vec<FileRecord>>,
    liability_insurance: Json<Vec<FileRecord>>,
    company_statutes: Json<Vec<FileRecord>>,
    client_ip: String,
    user_agent: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SubmissionRow {
    fn into_submission(self) -> Submission {
        Submission {
            id: self.id,
            profile: ApplicantProfile {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                phone: self.phone,
                street: self.street,
                postal_code: self.postal_code,
                city: self.city,
                country: self.country,
                tax_number: self.tax_number,
                vat_id: self.vat_id,
                iban: self.iban,
                bic: self.bic,
                hourly_rate: self.hourly_rate,
                travel_rate: self.travel_rate,
            },
            documents: DocumentBuckets {
                identity_document: self.identity_document.0,
                residency_proof: self.residency_proof.0,
                qualifications: self.qualifications.0,
                business_permit: self.business_permit.0,
                liability_insurance: self.liability_insurance.0,
                company_statutes: self.company_statutes.0,
            },
            provenance: Provenance {
                client_ip: self.client_ip,
                user_agent: self.user_agent,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for the `submissions` table.
///
/// Submissions are insert-only: there is no update or delete path.
#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist one assembled submission and return its generated id.
    #[tracing::instrument(
        skip(self, submission),
        fields(db.table = "submissions", db.operation = "insert")
    )]
    pub async fn save(&self, submission: &NewSubmission) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let profile = &submission.profile;
        let documents = &submission.documents;

        let (saved_id,): (Uuid,) = sqlx::query_as::<Postgres, (Uuid,)>(
            r#"
            INSERT INTO submissions (
                id,
                first_name, last_name, email, phone,
                street, postal_code, city, country,
                tax_number, vat_id, iban, bic,
                hourly_rate, travel_rate,
                identity_document, residency_proof, qualifications,
                business_permit, liability_insurance, company_statutes,
                client_ip, user_agent,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25
            )
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(&profile.street)
        .bind(&profile.postal_code)
        .bind(&profile.city)
        .bind(&profile.country)
        .bind(&profile.tax_number)
        .bind(&profile.vat_id)
        .bind(&profile.iban)
        .bind(&profile.bic)
        .bind(profile.hourly_rate)
        .bind(profile.travel_rate)
        .bind(Json(&documents.identity_document))
        .bind(Json(&documents.residency_proof))
        .bind(Json(&documents.qualifications))
        .bind(Json(&documents.business_permit))
        .bind(Json(&documents.liability_insurance))
        .bind(Json(&documents.company_statutes))
        .bind(&submission.provenance.client_ip)
        .bind(&submission.provenance.user_agent)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("A submission with this email already exists".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(saved_id)
    }

    /// All submissions, newest first. Empty when none exist.
    #[tracing::instrument(skip(self), fields(db.table = "submissions", db.operation = "select"))]
    pub async fn list_recent(&self) -> Result<Vec<Submission>, AppError> {
        let rows: Vec<SubmissionRow> = sqlx::query_as::<Postgres, SubmissionRow>(
            "SELECT * FROM submissions ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SubmissionRow::into_submission).collect())
    }

    /// Reconcile the configurable email-uniqueness constraint at startup.
    ///
    /// Applies or drops a partial unique index over lower(email) so both
    /// observed deployment variants stay available behind configuration.
    pub async fn ensure_email_uniqueness(&self, enabled: bool) -> Result<(), AppError> {
        if enabled {
            sqlx::query(
                "CREATE UNIQUE INDEX IF NOT EXISTS submissions_email_unique_idx \
                 ON submissions (lower(email)) WHERE email IS NOT NULL",
            )
            .execute(&self.pool)
            .await?;
            tracing::info!("Email uniqueness constraint enabled");
        } else {
            sqlx::query("DROP INDEX IF EXISTS submissions_email_unique_idx")
                .execute(&self.pool)
                .await?;
            tracing::debug!("Email uniqueness constraint disabled");
        }
        Ok(())
    }
}
