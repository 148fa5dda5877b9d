use super::{FieldRule, Schema};

/// Upper bound of the INTEGER columns.
const INT4_MAX: f64 = i32::MAX as f64;

const COMPANY_NEW_RULES: &[FieldRule] = &[
    FieldRule::string("handle").required(),
    FieldRule::string("name").required(),
    FieldRule::integer("num_employees").minimum(0.0).maximum(INT4_MAX),
    FieldRule::string("description").nullable(),
    FieldRule::string("logo_url").nullable().uri(),
];
pub const COMPANY_NEW: Schema = Schema::new(COMPANY_NEW_RULES);

const COMPANY_UPDATE_RULES: &[FieldRule] = &[
    FieldRule::string("name"),
    FieldRule::integer("num_employees").minimum(0.0).maximum(INT4_MAX),
    FieldRule::string("description").nullable(),
    FieldRule::string("logo_url").nullable().uri(),
];
pub const COMPANY_UPDATE: Schema = Schema::new(COMPANY_UPDATE_RULES);

const JOB_NEW_RULES: &[FieldRule] = &[
    FieldRule::string("title").required(),
    FieldRule::integer("salary").required().minimum(0.0).maximum(INT4_MAX),
    FieldRule::number("equity").required().minimum(0.0).maximum(1.0),
    FieldRule::string("company_handle").required(),
];
pub const JOB_NEW: Schema = Schema::new(JOB_NEW_RULES);

const JOB_UPDATE_RULES: &[FieldRule] = &[
    FieldRule::string("title"),
    FieldRule::integer("salary").minimum(0.0).maximum(INT4_MAX),
    FieldRule::number("equity").minimum(0.0).maximum(1.0),
    FieldRule::string("company_handle"),
];
pub const JOB_UPDATE: Schema = Schema::new(JOB_UPDATE_RULES);

const USER_NEW_RULES: &[FieldRule] = &[
    FieldRule::string("username").required(),
    FieldRule::string("password").required(),
    FieldRule::string("first_name").required(),
    FieldRule::string("last_name").required(),
    FieldRule::string("email").required(),
    FieldRule::string("photo_url").nullable().uri(),
];
pub const USER_NEW: Schema = Schema::new(USER_NEW_RULES);

const USER_UPDATE_RULES: &[FieldRule] = &[
    FieldRule::string("password"),
    FieldRule::string("first_name"),
    FieldRule::string("last_name"),
    FieldRule::string("email"),
    FieldRule::string("photo_url").nullable().uri(),
];
pub const USER_UPDATE: Schema = Schema::new(USER_UPDATE_RULES);

const LOGIN_RULES: &[FieldRule] = &[
    FieldRule::string("username").required(),
    FieldRule::string("password").required(),
];
pub const LOGIN: Schema = Schema::new(LOGIN_RULES);
