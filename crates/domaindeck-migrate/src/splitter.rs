/// Split a raw SQL script into standalone executable statements.
///
/// The scan is line-based. Outside a dollar-quoted body, blank lines and
/// `--` comment lines are dropped and a line ending in `;` finalizes the
/// statement being accumulated. Inside a dollar-quoted body every line is
/// kept verbatim, since comment markers and semicolons have no special
/// meaning there. A trailing buffer without a terminator is still emitted,
/// so a missing final semicolon is tolerated.
///
/// Dollar quoting is detected by counting literal `$$` markers per line;
/// an odd count toggles the body flag. Tagged delimiters like
/// `$fn$ ... $fn$` are not tracked, so scripts using them split at
/// semicolons inside the tagged body.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut buffer = String::new();
    let mut in_dollar_body = false;

    for line in script.lines() {
        let trimmed = line.trim();

        if !in_dollar_body && (trimmed.is_empty() || trimmed.starts_with("--")) {
            continue;
        }

        if line.matches("$$").count() % 2 == 1 {
            in_dollar_body = !in_dollar_body;
        }

        buffer.push_str(line);
        buffer.push('\n');

        if !in_dollar_body && trimmed.ends_with(';') {
            let statement = buffer.trim();
            if !statement.is_empty() && !statement.starts_with("--") {
                statements.push(statement.to_string());
            }
            buffer.clear();
        }
    }

    let tail = buffer.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::split_statements;

    #[test]
    fn splits_simple_statements_on_semicolons() {
        let script = "CREATE TABLE domains (id uuid);\nDELETE FROM alerts;\n";
        assert_eq!(
            split_statements(script),
            vec!["CREATE TABLE domains (id uuid);", "DELETE FROM alerts;"]
        );
    }

    #[test]
    fn statement_spans_lines_until_terminator() {
        let script = "CREATE TABLE domains (\n    id uuid PRIMARY KEY,\n    name text NOT NULL\n);\n";
        assert_eq!(
            split_statements(script),
            vec!["CREATE TABLE domains (\n    id uuid PRIMARY KEY,\n    name text NOT NULL\n);"]
        );
    }

    #[test]
    fn comment_and_blank_lines_are_dropped() {
        let script = "-- schema setup\n\nCREATE TABLE domains (id uuid);\n\n   -- cleanup\nDROP VIEW IF EXISTS expiring_domains;\n";
        assert_eq!(
            split_statements(script),
            vec![
                "CREATE TABLE domains (id uuid);",
                "DROP VIEW IF EXISTS expiring_domains;"
            ]
        );
    }

    #[test]
    fn comments_and_blanks_only_yield_nothing() {
        assert!(split_statements("-- nothing here\n\n--  at all\n").is_empty());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(split_statements("").is_empty());
        assert!(split_statements("\n\n").is_empty());
    }

    #[test]
    fn semicolons_inside_dollar_body_do_not_split() {
        let script = concat!(
            "CREATE FUNCTION touch_updated_at() RETURNS trigger AS $$\n",
            "BEGIN\n",
            "    NEW.updated_at = now();\n",
            "    RETURN NEW;\n",
            "END;\n",
            "$$ LANGUAGE plpgsql;\n",
        );
        let statements = split_statements(script);
        assert_eq!(statements.len(), 1);
        assert!(statements[0].contains("RETURN NEW;"));
        assert!(statements[0].ends_with("$$ LANGUAGE plpgsql;"));
    }

    #[test]
    fn comment_lines_inside_dollar_body_are_preserved() {
        let script = concat!(
            "CREATE FUNCTION noop() RETURNS void AS $$\n",
            "-- runs as a trigger, keep it empty\n",
            "BEGIN END;\n",
            "$$;\n",
        );
        let statements = split_statements(script);
        assert_eq!(statements.len(), 1);
        assert!(statements[0].contains("-- runs as a trigger, keep it empty"));
    }

    #[test]
    fn trailing_statement_without_semicolon_is_emitted() {
        let script = "CREATE TABLE domains (id uuid);\nUPDATE domains SET auto_renew = true";
        assert_eq!(
            split_statements(script),
            vec![
                "CREATE TABLE domains (id uuid);",
                "UPDATE domains SET auto_renew = true"
            ]
        );
    }

    #[test]
    fn dollar_body_opened_and_closed_on_one_line() {
        let script = "DO $$ BEGIN RAISE NOTICE 'migrating'; END $$;\nSELECT 1;\n";
        let statements = split_statements(script);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], "DO $$ BEGIN RAISE NOTICE 'migrating'; END $$;");
        assert_eq!(statements[1], "SELECT 1;");
    }

    #[test]
    fn tagged_dollar_quotes_are_not_tracked() {
        // Known limitation of the `$$`-counting heuristic: a $tag$ body is
        // split at its internal semicolons.
        let script = concat!(
            "CREATE FUNCTION purge() RETURNS void AS $fn$\n",
            "BEGIN\n",
            "    DELETE FROM alerts;\n",
            "END;\n",
            "$fn$ LANGUAGE plpgsql;\n",
        );
        let statements = split_statements(script);
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE FUNCTION purge()"));
    }
}
