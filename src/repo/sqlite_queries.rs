pub const QUERY_INIT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    seller_name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    whatsapp_number TEXT,
    category TEXT NOT NULL,
    language TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    notes TEXT,
    submitted_fields TEXT NOT NULL DEFAULT '{}',
    needs_info_reminder_sent_at TIMESTAMP,
    reviewed_at TIMESTAMP,
    badge_activated_at TIMESTAMP,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS sellers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL,
    city TEXT,
    shop_url TEXT,
    level TEXT NOT NULL DEFAULT 'basic',
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS badges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    seller_id INTEGER NOT NULL REFERENCES sellers(id),
    code TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL DEFAULT 'active',
    valid_until TIMESTAMP NOT NULL,
    issued_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS audit_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    entity_type TEXT NOT NULL,
    entity_id INTEGER NOT NULL,
    action TEXT NOT NULL,
    meta TEXT NOT NULL DEFAULT '{}',
    created_at TIMESTAMP NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_applications_status ON applications(status);
CREATE INDEX IF NOT EXISTS idx_badges_seller ON badges(seller_id);
"#;

pub const QUERY_INSERT_APPLICATION: &str = r#"
INSERT INTO applications(
    seller_name,email,phone,whatsapp_number,category,language,
    status,notes,submitted_fields,created_at,updated_at
) VALUES($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11);
"#;

pub const QUERY_GET_APPLICATION_BY_ID: &str = r#"
SELECT
    id,seller_name,email,phone,whatsapp_number,category,language,status,notes,
    submitted_fields,needs_info_reminder_sent_at,reviewed_at,badge_activated_at,
    created_at,updated_at
FROM applications
WHERE id=$1;
"#;

pub const QUERY_GET_APPLICATIONS: &str = r#"
SELECT
    id,seller_name,email,phone,whatsapp_number,category,language,status,notes,
    submitted_fields,needs_info_reminder_sent_at,reviewed_at,badge_activated_at,
    created_at,updated_at
FROM applications
WHERE (status=$1 OR $1='all')
ORDER BY created_at DESC;
"#;

pub const QUERY_COUNT_APPLICATIONS_BY_STATUS: &str = r#"
SELECT status, COUNT(*) AS total
FROM applications
GROUP BY status;
"#;

pub const QUERY_UPDATE_APPLICATION_STATUS: &str = r#"
UPDATE applications SET
    status=$2,
    notes=COALESCE($3, notes),
    reviewed_at=COALESCE($4, reviewed_at),
    badge_activated_at=COALESCE($5, badge_activated_at),
    updated_at=$6
WHERE id=$1;
"#;

pub const QUERY_UPDATE_SUBMITTED_FIELDS: &str = r#"
UPDATE applications SET submitted_fields=$2, updated_at=$3 WHERE id=$1;
"#;

pub const QUERY_APPLICATIONS_NEEDING_REMINDER: &str = r#"
SELECT
    id,seller_name,email,phone,whatsapp_number,category,language,status,notes,
    submitted_fields,needs_info_reminder_sent_at,reviewed_at,badge_activated_at,
    created_at,updated_at
FROM applications
WHERE
    status='needs_info' AND
    updated_at < $1 AND
    (needs_info_reminder_sent_at IS NULL OR needs_info_reminder_sent_at < $1);
"#;

pub const QUERY_SET_NEEDS_INFO_REMINDER_SENT: &str = r#"
UPDATE applications SET needs_info_reminder_sent_at=$2 WHERE id=$1;
"#;

pub const QUERY_UPSERT_SELLER: &str = r#"
INSERT INTO sellers(name,category,city,shop_url,level,created_at,updated_at)
VALUES($1,$2,$3,$4,$5,$6,$7)
ON CONFLICT(name) DO UPDATE SET
    level=excluded.level,
    updated_at=excluded.updated_at
RETURNING id;
"#;

pub const QUERY_GET_SELLER_BY_ID: &str = r#"
SELECT id,name,category,city,shop_url,level,created_at,updated_at
FROM sellers
WHERE id=$1;
"#;

pub const QUERY_INSERT_BADGE: &str = r#"
INSERT INTO badges(seller_id,code,status,valid_until,issued_at)
VALUES($1,$2,$3,$4,$5);
"#;

pub const QUERY_GET_BADGE_BY_ID: &str = r#"
SELECT id,seller_id,code,status,valid_until,issued_at
FROM badges
WHERE id=$1;
"#;

pub const QUERY_GET_BADGE_BY_CODE: &str = r#"
SELECT
    b.id,b.seller_id,b.code,b.status,b.valid_until,b.issued_at,
    s.id AS s_id,s.name AS s_name,s.category AS s_category,s.city AS s_city,
    s.shop_url AS s_shop_url,s.level AS s_level,
    s.created_at AS s_created_at,s.updated_at AS s_updated_at
FROM badges b
JOIN sellers s ON (s.id = b.seller_id)
WHERE b.code=$1;
"#;

pub const QUERY_GET_BADGES_BY_SELLER: &str = r#"
SELECT id,seller_id,code,status,valid_until,issued_at
FROM badges
WHERE seller_id=$1
ORDER BY issued_at DESC;
"#;

pub const QUERY_UPDATE_BADGE_STATUS: &str = r#"
UPDATE badges SET
    status=$2,
    valid_until=COALESCE($3, valid_until)
WHERE id=$1;
"#;

pub const QUERY_INSERT_AUDIT_LOG: &str = r#"
INSERT INTO audit_logs(entity_type,entity_id,action,meta,created_at)
VALUES($1,$2,$3,$4,$5);
"#;
