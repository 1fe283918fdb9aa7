use paylens_core::db::open_db_in_memory;
use paylens_core::{
    GatewayError, PaymentRepository, PayrollService, SqlitePaymentRepository, SqliteUserRepository,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

#[test]
fn company_payments_are_ordered_by_first_name_then_amount() {
    let conn = open_db_in_memory().unwrap();
    let acme = seed_company(&conn, "Acme");
    let boris = seed_user(&conn, "Boris", "Borisov", "1980-06-30", Some(acme));
    let anna = seed_user(&conn, "Anna", "Annova", "1990-03-14", Some(acme));
    seed_payment(&conn, 300, boris);
    seed_payment(&conn, 100, boris);
    seed_payment(&conn, 200, anna);
    let repo = SqlitePaymentRepository::try_new(&conn).unwrap();

    let payments = repo.find_all_by_company_name("Acme").unwrap();

    assert_eq!(payments.len(), 3);
    // Anna sorts before Boris; Boris's payments tie-break on amount.
    assert_eq!(payments[0].receiver_id, anna);
    assert_eq!(payments[1].receiver_id, boris);
    assert_eq!(payments[1].amount, 100);
    assert_eq!(payments[2].receiver_id, boris);
    assert_eq!(payments[2].amount, 300);
}

#[test]
fn company_payments_exclude_other_companies_and_unemployed_receivers() {
    let conn = open_db_in_memory().unwrap();
    let acme = seed_company(&conn, "Acme");
    let globex = seed_company(&conn, "Globex");
    let insider = seed_user(&conn, "Ivan", "Ivanov", "1990-03-14", Some(acme));
    let outsider = seed_user(&conn, "Petr", "Petrov", "1985-11-02", Some(globex));
    let freelancer = seed_user(&conn, "Free", "Lancer", "1988-08-08", None);
    seed_payment(&conn, 100, insider);
    seed_payment(&conn, 200, outsider);
    seed_payment(&conn, 300, freelancer);
    let repo = SqlitePaymentRepository::try_new(&conn).unwrap();

    let payments = repo.find_all_by_company_name("Acme").unwrap();

    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].receiver_id, insider);
}

#[test]
fn average_amount_for_three_payments_is_their_mean() {
    let conn = open_db_in_memory().unwrap();
    let ivan = seed_user(&conn, "Ivan", "Ivanov", "1990-03-14", None);
    seed_payment(&conn, 10, ivan);
    seed_payment(&conn, 20, ivan);
    seed_payment(&conn, 30, ivan);
    let repo = SqlitePaymentRepository::try_new(&conn).unwrap();

    let average = repo
        .average_amount_by_receiver_name("Ivan", "Ivanov")
        .unwrap();

    assert_eq!(average, 20.0);
}

#[test]
fn average_amount_over_singleton_set_is_that_exact_value() {
    let conn = open_db_in_memory().unwrap();
    let ivan = seed_user(&conn, "Ivan", "Ivanov", "1990-03-14", None);
    seed_payment(&conn, 137, ivan);
    let repo = SqlitePaymentRepository::try_new(&conn).unwrap();

    let average = repo
        .average_amount_by_receiver_name("Ivan", "Ivanov")
        .unwrap();

    assert_eq!(average, 137.0);
}

#[test]
fn average_amount_without_matching_payments_is_empty_result() {
    let conn = open_db_in_memory().unwrap();
    seed_user(&conn, "Ivan", "Ivanov", "1990-03-14", None);
    let repo = SqlitePaymentRepository::try_new(&conn).unwrap();

    let err = repo
        .average_amount_by_receiver_name("Ivan", "Ivanov")
        .unwrap_err();

    assert!(matches!(err, GatewayError::EmptyResult));
}

#[test]
fn company_average_amounts_are_ordered_by_company_name() {
    let conn = open_db_in_memory().unwrap();
    let globex = seed_company(&conn, "Globex");
    let acme = seed_company(&conn, "Acme");
    let at_acme = seed_user(&conn, "Anna", "Annova", "1990-03-14", Some(acme));
    let at_globex = seed_user(&conn, "Boris", "Borisov", "1980-06-30", Some(globex));
    seed_payment(&conn, 100, at_acme);
    seed_payment(&conn, 300, at_acme);
    seed_payment(&conn, 50, at_globex);
    let repo = SqlitePaymentRepository::try_new(&conn).unwrap();

    let report = repo.company_average_amounts().unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(report[0].company_name, "Acme");
    assert_eq!(report[0].average_amount, 200.0);
    assert_eq!(report[1].company_name, "Globex");
    assert_eq!(report[1].average_amount, 50.0);
}

#[test]
fn receivers_above_overall_average_keeps_only_strictly_above_groups() {
    let conn = open_db_in_memory().unwrap();
    // Per-user averages 50/150/100; the overall payment average is 100, so
    // only the 150 group strictly exceeds it.
    let low = seed_user(&conn, "Anna", "Low", "1990-03-14", None);
    let high = seed_user(&conn, "Boris", "High", "1980-06-30", None);
    let at_average = seed_user(&conn, "Vera", "Mean", "1985-01-01", None);
    seed_payment(&conn, 50, low);
    seed_payment(&conn, 150, high);
    seed_payment(&conn, 100, at_average);
    let repo = SqlitePaymentRepository::try_new(&conn).unwrap();

    let top = repo.receivers_above_overall_average().unwrap();

    assert_eq!(top.len(), 1);
    assert_eq!(top[0].user.id, high);
    assert_eq!(top[0].average_amount, 150.0);
}

#[test]
fn receivers_above_overall_average_are_ordered_by_first_name() {
    let conn = open_db_in_memory().unwrap();
    let zoya = seed_user(&conn, "Zoya", "Zima", "1990-03-14", None);
    let anna = seed_user(&conn, "Anna", "Leto", "1980-06-30", None);
    let filler = seed_user(&conn, "Mid", "Filler", "1985-01-01", None);
    seed_payment(&conn, 200, zoya);
    seed_payment(&conn, 300, anna);
    seed_payment(&conn, 10, filler);
    let repo = SqlitePaymentRepository::try_new(&conn).unwrap();

    let top = repo.receivers_above_overall_average().unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].user.personal_info.first_name, "Anna");
    assert_eq!(top[1].user.personal_info.first_name, "Zoya");
}

#[test]
fn payroll_service_delegates_to_repositories() {
    let conn = open_db_in_memory().unwrap();
    let acme = seed_company(&conn, "Acme");
    let ivan = seed_user(&conn, "Ivan", "Ivanov", "1990-03-14", Some(acme));
    seed_payment(&conn, 40, ivan);
    seed_payment(&conn, 60, ivan);
    let service = PayrollService::new(
        SqliteUserRepository::try_new(&conn).unwrap(),
        SqlitePaymentRepository::try_new(&conn).unwrap(),
    );

    assert_eq!(service.staff().unwrap().len(), 1);
    assert_eq!(service.company_staff("Acme").unwrap()[0].id, ivan);
    assert_eq!(service.company_payments("Acme").unwrap().len(), 2);
    assert_eq!(service.average_payment("Ivan", "Ivanov").unwrap(), 50.0);

    let report = service.company_salary_report().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].company_name, "Acme");
    assert_eq!(report[0].average_amount, 50.0);
}

fn seed_company(conn: &Connection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO companies (uuid, name) VALUES (?1, ?2);",
        params![id.to_string(), name],
    )
    .unwrap();
    id
}

fn seed_user(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
    birth_date: &str,
    company: Option<Uuid>,
) -> Uuid {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO users (uuid, first_name, last_name, birth_date, company_uuid)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            id.to_string(),
            first_name,
            last_name,
            birth_date,
            company.map(|company_id| company_id.to_string()),
        ],
    )
    .unwrap();
    id
}

fn seed_payment(conn: &Connection, amount: i64, receiver: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO payments (uuid, amount, paid_at, receiver_uuid)
         VALUES (?1, ?2, NULL, ?3);",
        params![id.to_string(), amount, receiver.to_string()],
    )
    .unwrap();
    id
}
