use serde::Deserialize;

use crate::web::{
    data::GradeGroup,
    forms::{FieldErrors, MarksForm, RegisterForm, StudentFormData},
    models::{MarkRow, StudentRow},
};

const BASE_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
        header { background: #ffffff; padding: 1.5rem; border-bottom: 1px solid #e2e8f0; }
        .header-bar { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; }
        .header-bar h1 { margin: 0; font-size: 1.5rem; }
        .nav-link { display: inline-flex; align-items: center; gap: 0.4rem; color: #1d4ed8; text-decoration: none; font-weight: 600; background: #e0f2fe; padding: 0.45rem 0.9rem; border-radius: 999px; border: 1px solid #bfdbfe; }
        .nav-link:hover { background: #bfdbfe; }
        main { padding: 2rem 1.5rem; max-width: 960px; margin: 0 auto; box-sizing: border-box; }
        .panel { background: #ffffff; border-radius: 12px; border: 1px solid #e2e8f0; padding: 1.5rem; margin-bottom: 1.5rem; box-shadow: 0 12px 30px rgba(15, 23, 42, 0.06); }
        .panel h2 { margin-top: 0; }
        label { display: block; margin-top: 1rem; font-weight: 600; color: #0f172a; }
        input, select { width: 100%; padding: 0.7rem; margin-top: 0.4rem; border-radius: 8px; border: 1px solid #cbd5f5; background: #f8fafc; color: #0f172a; box-sizing: border-box; }
        input:focus, select:focus { outline: none; border-color: #2563eb; box-shadow: 0 0 0 3px rgba(37, 99, 235, 0.12); }
        button { margin-top: 1.5rem; padding: 0.8rem 1.2rem; border: none; border-radius: 8px; background: #2563eb; color: #ffffff; font-weight: 600; cursor: pointer; }
        button:hover { background: #1d4ed8; }
        button.danger { background: #dc2626; margin-top: 0; padding: 0.4rem 0.8rem; }
        button.danger:hover { background: #b91c1c; }
        table { width: 100%; border-collapse: collapse; margin-top: 1rem; background: #ffffff; border: 1px solid #e2e8f0; border-radius: 12px; overflow: hidden; }
        th, td { padding: 0.7rem 1rem; border-bottom: 1px solid #e2e8f0; text-align: left; vertical-align: middle; }
        th { background: #f1f5f9; font-weight: 600; }
        .notice { margin-bottom: 1.5rem; padding: 0.85rem 1rem; border-radius: 8px; font-weight: 600; }
        .notice.success { background: #dcfce7; color: #166534; }
        .notice.danger { background: #fee2e2; color: #b91c1c; }
        .field-error { display: block; margin-top: 0.3rem; color: #b91c1c; font-size: 0.9rem; font-weight: 600; }
        .hint { color: #475569; font-size: 0.9rem; margin-top: 0.3rem; }
        .thumb { width: 48px; height: 48px; object-fit: cover; border-radius: 8px; border: 1px solid #e2e8f0; }
        .actions { display: flex; gap: 0.5rem; align-items: center; flex-wrap: wrap; }
        .actions a { color: #1d4ed8; text-decoration: none; font-weight: 600; }
        .actions a:hover { text-decoration: underline; }
        .filter-bar { display: flex; gap: 1rem; align-items: flex-end; flex-wrap: wrap; }
        .filter-bar label { margin-top: 0; min-width: 180px; }
        .filter-bar button { margin-top: 0; }
        .filter-bar a { color: #475569; font-weight: 600; text-decoration: none; padding-bottom: 0.8rem; }
"#;

/// One-shot notice codes carried on redirect targets.
#[derive(Default, Deserialize)]
pub struct NoticeQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

fn status_message(code: &str) -> Option<&'static str> {
    match code {
        "logged_out" => Some("You have been logged out."),
        "registered" => Some("Admin registered successfully!"),
        "student_added" => Some("Student added successfully!"),
        "student_updated" => Some("Student updated successfully!"),
        "student_deleted" => Some("Student and their marks deleted successfully!"),
        "marks_added" => Some("Marks added successfully!"),
        "marks_updated" => Some("Marks updated successfully!"),
        "marks_deleted" => Some("Marks deleted successfully!"),
        _ => None,
    }
}

fn error_message(code: &str) -> Option<&'static str> {
    match code {
        "invalid_credentials" => Some("Login unsuccessful. Please check email and password."),
        "not_authorized" => Some("You are not authorized to view that page."),
        "invalid_student_id" => Some("Invalid student ID."),
        "student_not_found" => Some("Student not found."),
        "invalid_mark_id" => Some("Invalid mark ID."),
        "marks_not_found" => Some("Marks not found."),
        "unknown" => Some("Something went wrong. Please try again."),
        _ => None,
    }
}

pub fn render_notices(params: &NoticeQuery) -> String {
    let mut html = String::new();

    if let Some(message) = params.status.as_deref().and_then(status_message) {
        html.push_str(&format!(r#"<div class="notice success">{message}</div>"#));
    }
    if let Some(message) = params.error.as_deref().and_then(error_message) {
        html.push_str(&format!(r#"<div class="notice danger">{message}</div>"#));
    }

    html
}

fn page_shell(title: &str, heading: &str, nav_html: &str, body_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
{styles}
    </style>
</head>
<body>
    <header>
        <div class="header-bar">
            <h1>{heading}</h1>
            <div class="actions">{nav_html}</div>
        </div>
    </header>
    <main>
{body_html}
    </main>
</body>
</html>"#,
        title = title,
        heading = heading,
        nav_html = nav_html,
        body_html = body_html,
        styles = BASE_STYLES,
    )
}

fn field_error_html(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|message| format!(r#"<span class="field-error">{}</span>"#, escape_html(message)))
        .unwrap_or_default()
}

fn form_notice(errors: &FieldErrors, notice: Option<&str>) -> String {
    if let Some(message) = notice {
        format!(
            r#"<div class="notice danger">{}</div>"#,
            escape_html(message)
        )
    } else if !errors.is_empty() {
        r#"<div class="notice danger">Please correct the errors below.</div>"#.to_string()
    } else {
        String::new()
    }
}

pub fn render_home(params: &NoticeQuery) -> String {
    let notices = render_notices(params);
    let body = format!(
        r#"{notices}
        <section class="panel">
            <h2>Welcome</h2>
            <p>Manage student records and subject marks, or check your own results.</p>
            <div class="actions">
                <a class="nav-link" href="/admin/login">Admin Login</a>
                <a class="nav-link" href="/admin/register">Admin Register</a>
                <a class="nav-link" href="/student/login">Student Login</a>
            </div>
        </section>"#,
        notices = notices,
    );
    page_shell("School Administration", "School Administration", "", &body)
}

pub fn render_login_page(
    title: &str,
    action: &str,
    show_register_link: bool,
    params: &NoticeQuery,
) -> String {
    let notices = render_notices(params);
    let register_link = if show_register_link {
        r#"<p class="hint">No account yet? <a href="/admin/register">Register here</a>.</p>"#
    } else {
        ""
    };

    let body = format!(
        r#"{notices}
        <section class="panel">
            <h2>{title}</h2>
            <form method="post" action="{action}">
                <label for="email">Email</label>
                <input id="email" name="email" type="email" required>
                <label for="password">Password</label>
                <input id="password" name="password" type="password" required>
                <button type="submit">Login</button>
            </form>
            {register_link}
        </section>"#,
        notices = notices,
        title = title,
        action = action,
        register_link = register_link,
    );

    page_shell(title, title, r#"<a class="nav-link" href="/">Home</a>"#, &body)
}

pub fn render_register_page(form: &RegisterForm, errors: &FieldErrors) -> String {
    let notice = form_notice(errors, None);
    let body = format!(
        r#"{notice}
        <section class="panel">
            <h2>Admin Register</h2>
            <form method="post" action="/admin/register">
                <label for="email">Email</label>
                <input id="email" name="email" value="{email}">
                {email_error}
                <label for="password">Password</label>
                <input id="password" name="password" type="password">
                {password_error}
                <label for="confirm_password">Confirm Password</label>
                <input id="confirm_password" name="confirm_password" type="password">
                {confirm_error}
                <button type="submit">Register</button>
            </form>
            <p class="hint">Already registered? <a href="/admin/login">Login here</a>.</p>
        </section>"#,
        notice = notice,
        email = escape_html(&form.email),
        email_error = field_error_html(errors, "email"),
        password_error = field_error_html(errors, "password"),
        confirm_error = field_error_html(errors, "confirm_password"),
    );

    page_shell(
        "Admin Register",
        "Admin Register",
        r#"<a class="nav-link" href="/">Home</a>"#,
        &body,
    )
}

pub fn render_student_form_page(
    heading: &str,
    action: &str,
    form: &StudentFormData,
    errors: &FieldErrors,
    existing_photo: Option<&str>,
    editing: bool,
    notice: Option<&str>,
) -> String {
    let notice = form_notice(errors, notice);

    let photo_hint = match existing_photo {
        Some(photo) => format!(
            r#"<p class="hint">Current photo: <a href="/show/{photo}">{photo}</a>. Leave empty to keep it.</p>"#,
            photo = escape_html(photo),
        ),
        None => String::new(),
    };
    let password_hint = if editing {
        r#"<p class="hint">Leave empty to keep the current password.</p>"#
    } else {
        ""
    };

    let body = format!(
        r#"{notice}
        <section class="panel">
            <h2>{heading}</h2>
            <form method="post" action="{action}" enctype="multipart/form-data">
                <label for="name">Name</label>
                <input id="name" name="name" value="{name}">
                {name_error}
                <label for="age">Age</label>
                <input id="age" name="age" value="{age}">
                {age_error}
                <label for="roll_number">Roll Number</label>
                <input id="roll_number" name="roll_number" value="{roll_number}">
                {roll_error}
                <label for="grade">Grade</label>
                <input id="grade" name="grade" value="{grade}">
                {grade_error}
                <label for="email">Email</label>
                <input id="email" name="email" value="{email}">
                {email_error}
                <label for="photo">Photo</label>
                <input id="photo" name="photo" type="file">
                {photo_error}
                {photo_hint}
                <label for="password">Password</label>
                <input id="password" name="password" type="password">
                {password_error}
                {password_hint}
                <button type="submit">Submit</button>
            </form>
        </section>"#,
        notice = notice,
        heading = heading,
        action = action,
        name = escape_html(&form.name),
        name_error = field_error_html(errors, "name"),
        age = escape_html(&form.age),
        age_error = field_error_html(errors, "age"),
        roll_number = escape_html(&form.roll_number),
        roll_error = field_error_html(errors, "roll_number"),
        grade = escape_html(&form.grade),
        grade_error = field_error_html(errors, "grade"),
        email = escape_html(&form.email),
        email_error = field_error_html(errors, "email"),
        photo_error = field_error_html(errors, "photo"),
        photo_hint = photo_hint,
        password_error = field_error_html(errors, "password"),
        password_hint = password_hint,
    );

    page_shell(
        heading,
        heading,
        r#"<a class="nav-link" href="/admin">Back to Roster</a>"#,
        &body,
    )
}

pub fn render_marks_form_page(
    heading: &str,
    action: &str,
    form: &MarksForm,
    errors: &FieldErrors,
    student_label: Option<&str>,
) -> String {
    let notice = form_notice(errors, None);
    let student_line = student_label
        .map(|label| format!(r#"<p class="hint">Student: {}</p>"#, escape_html(label)))
        .unwrap_or_default();

    let body = format!(
        r#"{notice}
        <section class="panel">
            <h2>{heading}</h2>
            {student_line}
            <form method="post" action="{action}">
                <label for="subject">Subject</label>
                <input id="subject" name="subject" value="{subject}">
                {subject_error}
                <label for="marks">Marks</label>
                <input id="marks" name="marks" value="{marks}">
                {marks_error}
                <button type="submit">Submit</button>
            </form>
        </section>"#,
        notice = notice,
        heading = heading,
        student_line = student_line,
        action = action,
        subject = escape_html(&form.subject),
        subject_error = field_error_html(errors, "subject"),
        marks = escape_html(&form.marks),
        marks_error = field_error_html(errors, "marks"),
    );

    page_shell(
        heading,
        heading,
        r#"<a class="nav-link" href="/admin">Back to Roster</a>"#,
        &body,
    )
}

fn select_options(values: &[String], selected: Option<&str>) -> String {
    let mut html = String::from(r#"<option value="">All</option>"#);
    for value in values {
        let marker = if selected == Some(value.as_str()) {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            r#"<option value="{value}"{marker}>{value}</option>"#,
            value = escape_html(value),
            marker = marker,
        ));
    }
    html
}

pub fn render_roster_page(
    groups: &[GradeGroup],
    all_grades: &[String],
    roll_numbers: &[String],
    selected_grade: Option<&str>,
    selected_roll_number: Option<&str>,
    params: &NoticeQuery,
) -> String {
    let notices = render_notices(params);

    let filter_bar = format!(
        r#"<section class="panel">
            <form method="get" action="/admin" class="filter-bar">
                <label>Grade
                    <select name="grade">{grade_options}</select>
                </label>
                <label>Roll Number
                    <select name="roll_number">{roll_options}</select>
                </label>
                <button type="submit">Filter</button>
                <a href="/admin">Clear</a>
            </form>
        </section>"#,
        grade_options = select_options(all_grades, selected_grade),
        roll_options = select_options(roll_numbers, selected_roll_number),
    );

    let mut groups_html = String::new();
    if groups.is_empty() {
        groups_html.push_str(r#"<section class="panel"><p>No students found.</p></section>"#);
    }
    for group in groups {
        let mut rows = String::new();
        for student in &group.students {
            let photo_cell = student
                .photo
                .as_deref()
                .map(|photo| {
                    format!(
                        r#"<a href="/show/{photo}"><img class="thumb" src="/uploads/{photo}" alt=""></a>"#,
                        photo = escape_html(photo),
                    )
                })
                .unwrap_or_default();

            rows.push_str(&format!(
                r#"<tr>
                    <td>{photo_cell}</td>
                    <td>{name}</td>
                    <td>{roll_number}</td>
                    <td>{email}</td>
                    <td class="actions">
                        <a href="/admin/student_marks/{id}">Marks</a>
                        <a href="/admin/add_marks/{id}">Add Marks</a>
                        <a href="/admin/edit_student/{id}">Edit</a>
                        <form method="post" action="/admin/delete_student/{id}">
                            <button type="submit" class="danger">Delete</button>
                        </form>
                    </td>
                </tr>"#,
                photo_cell = photo_cell,
                name = escape_html(&student.name),
                roll_number = escape_html(&student.roll_number),
                email = escape_html(&student.email),
                id = student.id,
            ));
        }

        groups_html.push_str(&format!(
            r#"<section class="panel">
                <h2>Grade {grade}</h2>
                <table>
                    <tr><th>Photo</th><th>Name</th><th>Roll Number</th><th>Email</th><th>Actions</th></tr>
                    {rows}
                </table>
            </section>"#,
            grade = escape_html(&group.grade),
            rows = rows,
        ));
    }

    let body = format!("{notices}{filter_bar}{groups_html}");
    let nav = r#"<a class="nav-link" href="/admin/add_student">Add Student</a><a class="nav-link" href="/admin/logout">Logout</a>"#;
    page_shell("Student Roster", "Student Roster", nav, &body)
}

fn marks_table(marks: &[MarkRow], with_actions: bool) -> String {
    if marks.is_empty() {
        return r#"<p>No marks recorded yet.</p>"#.to_string();
    }

    let actions_header = if with_actions { "<th>Actions</th>" } else { "" };
    let mut rows = String::new();
    for mark in marks {
        let actions_cell = if with_actions {
            format!(
                r#"<td class="actions">
                    <a href="/admin/edit_marks/{id}">Edit</a>
                    <form method="post" action="/admin/delete_marks/{id}">
                        <button type="submit" class="danger">Delete</button>
                    </form>
                </td>"#,
                id = mark.id,
            )
        } else {
            String::new()
        };

        rows.push_str(&format!(
            r#"<tr><td>{subject}</td><td>{marks}</td><td>{date}</td>{actions_cell}</tr>"#,
            subject = escape_html(&mark.subject),
            marks = mark.marks,
            date = mark.date.format("%Y-%m-%d %H:%M"),
            actions_cell = actions_cell,
        ));
    }

    format!(
        r#"<table>
            <tr><th>Subject</th><th>Marks</th><th>Date</th>{actions_header}</tr>
            {rows}
        </table>"#,
        actions_header = actions_header,
        rows = rows,
    )
}

pub fn render_student_marks_page(student: &StudentRow, marks: &[MarkRow]) -> String {
    let heading = format!("Marks for {}", escape_html(&student.name));
    let body = format!(
        r#"<section class="panel">
            <h2>{name} (Grade {grade}, Roll {roll_number})</h2>
            {table}
        </section>"#,
        name = escape_html(&student.name),
        grade = escape_html(&student.grade),
        roll_number = escape_html(&student.roll_number),
        table = marks_table(marks, true),
    );

    let nav = format!(
        r#"<a class="nav-link" href="/admin/add_marks/{id}">Add Marks</a><a class="nav-link" href="/admin">Back to Roster</a>"#,
        id = student.id,
    );
    page_shell(&heading, &heading, &nav, &body)
}

pub fn render_marks_list_page(student: &StudentRow, marks: &[MarkRow]) -> String {
    let body = format!(
        r#"<section class="panel">
            <h2>Your Marks</h2>
            <p class="hint">{name} (Grade {grade}, Roll {roll_number})</p>
            {table}
        </section>"#,
        name = escape_html(&student.name),
        grade = escape_html(&student.grade),
        roll_number = escape_html(&student.roll_number),
        table = marks_table(marks, false),
    );

    page_shell(
        "My Marks",
        "My Marks",
        r#"<a class="nav-link" href="/student/logout">Logout</a>"#,
        &body,
    )
}

pub fn render_show_photo_page(filename: &str) -> String {
    let filename = escape_html(filename);
    let body = format!(
        r#"<section class="panel">
            <h2>{filename}</h2>
            <img src="/uploads/{filename}" alt="{filename}" style="max-width: 100%; border-radius: 12px;">
        </section>"#,
        filename = filename,
    );

    page_shell("Photo", "Photo", r#"<a class="nav-link" href="/">Home</a>"#, &body)
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_notice_codes_have_messages() {
        assert!(status_message("student_added").is_some());
        assert!(status_message("logged_out").is_some());
        assert!(error_message("invalid_credentials").is_some());
        assert!(error_message("marks_not_found").is_some());
    }

    #[test]
    fn unknown_notice_codes_render_nothing() {
        let params = NoticeQuery {
            status: Some("nope".to_string()),
            error: Some("nope".to_string()),
        };
        assert!(render_notices(&params).is_empty());
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<img src="x" onerror='y'>"#),
            "&lt;img src=&quot;x&quot; onerror=&#39;y&#39;&gt;"
        );
    }

    #[test]
    fn select_options_marks_selection() {
        let options = select_options(&["5A".to_string(), "6B".to_string()], Some("6B"));
        assert!(options.contains(r#"<option value="6B" selected>6B</option>"#));
        assert!(options.contains(r#"<option value="5A">5A</option>"#));
    }
}
