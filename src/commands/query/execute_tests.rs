//! Execute tests for query command.

#[cfg(test)]
mod tests {
    use super::super::QueryCmd;
    use crate::db::CellValue;
    use rstest::{fixture, rstest};

    crate::session_fixture! {}

    // =========================================================================
    // Core functionality tests
    // =========================================================================

    // Sacks: 2 SHOTGUN, 1 UNDER CENTER
    crate::execute_test! {
        test_name: test_query_sacks_by_formation,
        fixture: session,
        cmd: QueryCmd {
            sql: crate::config::DEFAULT_QUERY.to_string(),
            all: false,
        },
        assertions: |result| {
            assert_eq!(result.results.len(), 1);
            let rs = &result.results[0];
            assert_eq!(rs.columns(), ["sacks", "formation"]);
            assert_eq!(
                rs.rows(),
                [
                    vec![CellValue::Integer(2), CellValue::Text("SHOTGUN".into())],
                    vec![CellValue::Integer(1), CellValue::Text("UNDER CENTER".into())],
                ]
            );
        },
    }

    crate::execute_test! {
        test_name: test_query_first_result_only,
        fixture: session,
        cmd: QueryCmd {
            sql: "select count(*) as plays from plays; select count(*) as teams from teams".to_string(),
            all: false,
        },
        assertions: |result| {
            assert_eq!(result.results.len(), 1);
            assert_eq!(result.results[0].columns(), ["plays"]);
        },
    }

    crate::execute_test! {
        test_name: test_query_all_results,
        fixture: session,
        cmd: QueryCmd {
            sql: "select count(*) as plays from plays; select count(*) as teams from teams".to_string(),
            all: true,
        },
        assertions: |result| {
            assert_eq!(result.results.len(), 2);
            assert_eq!(result.results[1].rows(), [vec![CellValue::Integer(2)]]);
        },
    }

    crate::execute_test! {
        test_name: test_query_zero_rows_keeps_columns,
        fixture: session,
        cmd: QueryCmd {
            sql: "select id from plays where yards > 100".to_string(),
            all: false,
        },
        assertions: |result| {
            assert_eq!(result.results[0].columns(), ["id"]);
            assert!(result.results[0].rows().is_empty());
        },
    }

    crate::execute_test! {
        test_name: test_query_null_cell,
        fixture: session,
        cmd: QueryCmd {
            sql: "select description from plays where id = 6".to_string(),
            all: false,
        },
        assertions: |result| {
            assert_eq!(result.results[0].rows(), [vec![CellValue::Null]]);
        },
    }

    // =========================================================================
    // Error tests
    // =========================================================================

    crate::execute_error_test! {
        test_name: test_query_missing_table,
        fixture: session,
        cmd: QueryCmd {
            sql: "select * from nope".to_string(),
            all: false,
        },
        error_contains: "no such table: nope",
    }

    crate::execute_error_test! {
        test_name: test_query_write_rejected,
        fixture: session,
        cmd: QueryCmd {
            sql: "delete from plays".to_string(),
            all: false,
        },
        error_contains: "readonly",
    }

    crate::execute_not_ready_test! {
        cmd_type: QueryCmd,
        cmd: QueryCmd {
            sql: "select 1".to_string(),
            all: false,
        },
    }

    #[rstest]
    fn test_rejected_query_is_recorded(session: crate::session::Session) {
        use crate::commands::Execute;
        let mut session = session;
        let cmd = QueryCmd {
            sql: "select * from nope".to_string(),
            all: false,
        };
        assert!(cmd.execute(&mut session).is_err());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.query_text.as_deref(), Some("select * from nope"));
        assert_eq!(snapshot.query.error().unwrap().message, "no such table: nope");
    }
}
