//! Account registration.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info, instrument, trace, warn};

use model::entities::{
    user::{self, UserStatus},
    user_term,
};

use crate::error::{Result, SocialError};
use crate::password;

pub const MIN_PASSWORD_LENGTH: usize = 8;
/// `userType` value that registers a brand account.
pub const BRAND_USER_TYPE: &str = "1";

pub const MISSING_FIELDS: &str = "필수 정보를 모두 입력해주세요.";
pub const PASSWORD_MISMATCH: &str = "비밀번호가 일치하지 않습니다.";
pub const PASSWORD_TOO_SHORT: &str = "비밀번호는 8자 이상이어야 합니다.";
pub const TERMS_REQUIRED: &str = "필수 약관에 동의해주세요.";
pub const BRAND_INFO_REQUIRED: &str = "브랜드 정보를 모두 입력해주세요.";
pub const DUPLICATE_USER_ID: &str = "이미 사용중인 아이디입니다.";
pub const DUPLICATE_TAG_ID: &str = "이미 사용중인 태그 ID입니다.";
pub const DUPLICATE_INFO: &str = "이미 사용중인 정보입니다. 다른 정보를 입력해주세요.";

/// A signup form as submitted. Required text fields are optional here so that
/// a missing field and an empty one are rejected the same way.
#[derive(Debug, Clone, Default)]
pub struct Signup {
    pub user_id: Option<String>,
    pub tag_id: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub name: Option<String>,
    pub user_type: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth: Option<String>,
    pub adult_agree: bool,
    pub store_agree: bool,
    pub marketing_agree: bool,
    pub ap_agree: bool,
    pub business_type: Option<String>,
    pub corporate_name: Option<String>,
    pub corporate_id1: Option<String>,
    pub corporate_id2: Option<String>,
    pub business_email: Option<String>,
    pub business_phone: Option<String>,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

struct Checked {
    user_id: String,
    tag_id: String,
    password: String,
    name: String,
    is_brand: bool,
}

/// Input checks in the order members see them reported.
fn check(form: &Signup) -> Result<Checked> {
    let (Some(user_id), Some(tag_id), Some(name)) =
        (present(&form.user_id), present(&form.tag_id), present(&form.name))
    else {
        return Err(SocialError::validation(MISSING_FIELDS));
    };
    let password = match form.password.as_deref() {
        Some(password) if !password.is_empty() => password.to_string(),
        _ => return Err(SocialError::validation(MISSING_FIELDS)),
    };

    if form.confirm_password.as_deref() != Some(password.as_str()) {
        return Err(SocialError::validation(PASSWORD_MISMATCH));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(SocialError::validation(PASSWORD_TOO_SHORT));
    }
    if !(form.adult_agree && form.store_agree && form.ap_agree) {
        return Err(SocialError::validation(TERMS_REQUIRED));
    }

    let is_brand = form.user_type.as_deref() == Some(BRAND_USER_TYPE);
    if is_brand && (present(&form.business_type).is_none() || present(&form.corporate_name).is_none()) {
        return Err(SocialError::validation(BRAND_INFO_REQUIRED));
    }

    Ok(Checked {
        user_id,
        tag_id,
        password,
        name,
        is_brand,
    })
}

fn conflict_on_unique(err: DbErr) -> SocialError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            warn!(%detail, "Signup lost a uniqueness race");
            SocialError::Conflict(DUPLICATE_INFO.to_string())
        }
        _ => SocialError::Database(err),
    }
}

/// Registers a new active account and its terms agreement.
///
/// The password is stored as a bcrypt hash at `bcrypt_cost`.
#[instrument(skip(db, form), fields(user_id = ?form.user_id))]
pub async fn signup(db: &DatabaseConnection, form: Signup, bcrypt_cost: u32) -> Result<user::Model> {
    trace!("Entering signup function");

    let checked = match check(&form) {
        Ok(checked) => checked,
        Err(err) => {
            warn!(%err, "Signup rejected");
            return Err(err);
        }
    };

    if user::Entity::find_by_id(checked.user_id.clone()).one(db).await?.is_some() {
        warn!("Signup with a taken user id");
        return Err(SocialError::Conflict(DUPLICATE_USER_ID.to_string()));
    }
    if user::Entity::find_by_tag(&checked.tag_id).one(db).await?.is_some() {
        warn!("Signup with a taken tag id");
        return Err(SocialError::Conflict(DUPLICATE_TAG_ID.to_string()));
    }

    let hashed = password::hash(checked.password, bcrypt_cost).await?;
    let now = Utc::now().naive_utc();
    let is_brand = checked.is_brand;
    let brand_field = |value: &Option<String>| if is_brand { present(value) } else { None };

    let account = user::ActiveModel {
        user_id: Set(checked.user_id),
        tag_id: Set(checked.tag_id),
        password: Set(hashed),
        name: Set(checked.name),
        status: Set(UserStatus::Active),
        is_brand: Set(is_brand),
        is_verified: Set(false),
        email: Set(present(&form.email)),
        phone: Set(present(&form.phone)),
        birth: Set(present(&form.birth)),
        business_type: Set(brand_field(&form.business_type)),
        corporate_name: Set(brand_field(&form.corporate_name)),
        corporate_id1: Set(brand_field(&form.corporate_id1)),
        corporate_id2: Set(brand_field(&form.corporate_id2)),
        business_email: Set(brand_field(&form.business_email)),
        business_phone: Set(brand_field(&form.business_phone)),
        created_at: Set(now),
        ..Default::default()
    };

    let txn = db.begin().await?;
    let created = account.insert(&txn).await.map_err(conflict_on_unique)?;
    user_term::ActiveModel {
        user_id: Set(created.user_id.clone()),
        adult_agree: Set(form.adult_agree),
        store_agree: Set(form.store_agree),
        marketing_agree: Set(form.marketing_agree),
        ap_agree: Set(form.ap_agree),
        agreed_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    debug!(is_brand = created.is_brand, "Stored new account");
    info!("Registered user {}", created.user_id);
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter};

    fn form() -> Signup {
        Signup {
            user_id: Some("newbie".to_string()),
            tag_id: Some("newbie_tag".to_string()),
            password: Some("longenough".to_string()),
            confirm_password: Some("longenough".to_string()),
            name: Some("Newbie".to_string()),
            user_type: Some("0".to_string()),
            adult_agree: true,
            store_agree: true,
            ap_agree: true,
            ..Default::default()
        }
    }

    fn message(result: Result<user::Model>) -> String {
        match result {
            Err(SocialError::Validation(message)) | Err(SocialError::Conflict(message)) => message,
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_signup_creates_hashed_account_and_terms() -> TestResult {
        let db = setup_db().await?;
        let created = signup(&db, form(), TEST_COST).await?;

        assert_eq!(created.status, UserStatus::Active);
        assert!(!created.is_brand);
        assert!(created.password.starts_with(password::HASH_MARKER));
        assert!(password::verify("longenough", &created.password));

        let terms = user_term::Entity::find()
            .filter(user_term::Column::UserId.eq("newbie"))
            .count(&db)
            .await?;
        assert_eq!(terms, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_validation_order() -> TestResult {
        let db = setup_db().await?;

        let cases = [
            (Signup { tag_id: None, ..form() }, MISSING_FIELDS),
            (Signup { name: Some("  ".to_string()), ..form() }, MISSING_FIELDS),
            (Signup { confirm_password: Some("different".to_string()), ..form() }, PASSWORD_MISMATCH),
            (
                Signup {
                    password: Some("seven77".to_string()),
                    confirm_password: Some("seven77".to_string()),
                    ..form()
                },
                PASSWORD_TOO_SHORT,
            ),
            (Signup { ap_agree: false, ..form() }, TERMS_REQUIRED),
            (Signup { user_type: Some("1".to_string()), ..form() }, BRAND_INFO_REQUIRED),
        ];
        for (input, expected) in cases {
            assert_eq!(message(signup(&db, input, TEST_COST).await), expected);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_eight_characters_reaches_duplicate_checks() -> TestResult {
        let db = setup_db().await?;
        new_user(&db, "taken").await?;

        let result = signup(
            &db,
            Signup {
                user_id: Some("taken".to_string()),
                password: Some("eight888".to_string()),
                confirm_password: Some("eight888".to_string()),
                ..form()
            },
            TEST_COST,
        )
        .await;
        assert_eq!(message(result), DUPLICATE_USER_ID);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_tag_is_a_conflict() -> TestResult {
        let db = setup_db().await?;
        new_user(&db, "someone").await?;

        let result = signup(
            &db,
            Signup { tag_id: Some("someone_tag".to_string()), ..form() },
            TEST_COST,
        )
        .await;
        assert_eq!(message(result), DUPLICATE_TAG_ID);
        Ok(())
    }

    #[tokio::test]
    async fn test_brand_signup_keeps_business_fields() -> TestResult {
        let db = setup_db().await?;
        let created = signup(
            &db,
            Signup {
                user_type: Some(BRAND_USER_TYPE.to_string()),
                business_type: Some("niche perfumery".to_string()),
                corporate_name: Some("Maison Vinscent".to_string()),
                corporate_id1: Some("123-45".to_string()),
                ..form()
            },
            TEST_COST,
        )
        .await?;

        assert!(created.is_brand);
        assert_eq!(created.corporate_name.as_deref(), Some("Maison Vinscent"));
        assert_eq!(created.corporate_id1.as_deref(), Some("123-45"));
        Ok(())
    }
}
