pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_organizations.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_organizations.sql")),
				"tables/002_employees.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_employees.sql")),
				"tables/003_emails.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_emails.sql")),
				"tables/004_email_analysis.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_email_analysis.sql")),
				"tables/005_tasks.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_tasks.sql")),
				"tables/006_sessions.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_sessions.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
