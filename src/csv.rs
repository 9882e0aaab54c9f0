//! Functions to serialize transactions to CSV text and to parse CSV text
//! back into import candidates.
//!
//! The format is a fixed six column layout:
//!
//! ```text
//! ID,Date,Title,Amount,Category,Type
//! ```
//!
//! Only the title is quoted, since it is the one field that may contain
//! commas or double quotes. Parsing is deliberately forgiving: rows that
//! cannot be tokenized into six fields are skipped rather than failing the
//! import, and the date, amount, and type fields are carried verbatim so
//! that rejection of bad values happens at merge time instead of parse time.

use crate::{
    Error,
    models::{Transaction, new_transaction_id, parse_date},
};

/// The header line every exported file starts with and every imported file
/// is expected to start with. The first line of imported text is always
/// discarded.
pub const CSV_HEADER: &str = "ID,Date,Title,Amount,Category,Type";

/// A candidate transaction recovered from one CSV row.
///
/// The date and kind are kept as the raw text from the file and the amount
/// may be NaN if the field did not parse as a number. The conversion into a
/// validated [Transaction] happens when the candidate is merged into the
/// store, so one bad field never blocks the rest of an import.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRecord {
    /// The ID from the file, or a freshly generated one if the field was
    /// empty.
    pub id: String,
    /// The date field, verbatim.
    pub date: String,
    /// The title with CSV quoting undone.
    pub title: String,
    /// The parsed amount, or NaN if the field was not a number.
    pub amount: f64,
    /// The category field, verbatim.
    pub category: String,
    /// The type field, verbatim.
    pub kind: String,
}

impl TryFrom<CsvRecord> for Transaction {
    type Error = Error;

    fn try_from(record: CsvRecord) -> Result<Self, Self::Error> {
        let date = parse_date(&record.date)?;
        let kind = record.kind.parse()?;

        let transaction = Transaction {
            id: record.id,
            date,
            title: record.title,
            amount: record.amount,
            category: record.category,
            kind,
        };
        transaction.validate()?;

        Ok(transaction)
    }
}

/// Serialize `transactions` to CSV text in the order given, which for an
/// export should be the store's iteration order rather than a filtered view.
///
/// The title is wrapped in double quotes with internal quotes doubled. The
/// remaining fields are emitted unquoted: IDs, dates, and kinds contain no
/// commas by construction, amounts are plain decimals, and the category set
/// is comma-free.
pub fn to_csv(transactions: &[Transaction]) -> String {
    let mut lines = Vec::with_capacity(transactions.len() + 1);
    lines.push(CSV_HEADER.to_owned());

    for transaction in transactions {
        lines.push(format!(
            "{},{},\"{}\",{},{},{}",
            transaction.id,
            transaction.date,
            transaction.title.replace('"', "\"\""),
            transaction.amount,
            transaction.category,
            transaction.kind,
        ));
    }

    lines.join("\n")
}

/// Parse CSV text into import candidates.
///
/// Expects `text` to start with a header line, which is discarded along with
/// blank lines. Each remaining line must tokenize into at least six fields;
/// lines that do not are skipped and logged at the `debug` level. Extra
/// fields beyond the sixth are ignored.
///
/// # Errors
/// This function will return an [Error::InvalidCsv] if the text contains an
/// unterminated quoted field, since the dangling quote makes the structure
/// of the whole file ambiguous. No candidates are returned in that case.
pub fn parse_csv(text: &str) -> Result<Vec<CsvRecord>, Error> {
    let mut records = Vec::new();

    for (line_number, line) in text.lines().enumerate() {
        if line_number == 0 || line.trim().is_empty() {
            continue;
        }

        let fields = match tokenize_line(line)? {
            Some(fields) => fields,
            None => {
                tracing::debug!("skipping CSV line {line_number}: malformed quoting");
                continue;
            }
        };

        if fields.len() < 6 {
            tracing::debug!(
                "skipping CSV line {line_number}: found {} fields, need 6",
                fields.len()
            );
            continue;
        }

        let id = if fields[0].is_empty() {
            new_transaction_id()
        } else {
            fields[0].clone()
        };
        let amount = fields[3].parse().unwrap_or(f64::NAN);

        records.push(CsvRecord {
            id,
            date: fields[1].clone(),
            title: fields[2].clone(),
            amount,
            category: fields[4].clone(),
            kind: fields[5].clone(),
        });
    }

    Ok(records)
}

/// The tokenizer state between two characters of a line.
enum TokenizerState {
    /// At the start of a field, before knowing whether it is quoted.
    FieldStart,
    /// Inside a quoted field.
    InQuoted,
    /// Inside an unquoted field.
    InUnquoted,
    /// Just consumed a `"` inside a quoted field; it either closes the field
    /// or is the first half of an escaped `""`.
    AfterQuote,
}

/// Split one line into fields, undoing CSV quoting.
///
/// Returns `Ok(None)` for a line whose quoting is malformed in a way that is
/// contained to the line (text after a closing quote), so the caller can
/// skip the row and keep importing.
///
/// # Errors
/// This function will return an [Error::InvalidCsv] if the line ends inside
/// a quoted field. Because lines are split before tokenizing, an open quote
/// here would have swallowed every following line of the file.
fn tokenize_line(line: &str) -> Result<Option<Vec<String>>, Error> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = TokenizerState::FieldStart;

    for character in line.chars() {
        state = match (state, character) {
            (TokenizerState::FieldStart, '"') => TokenizerState::InQuoted,
            (TokenizerState::FieldStart, ',') => {
                fields.push(std::mem::take(&mut field));
                TokenizerState::FieldStart
            }
            (TokenizerState::FieldStart, character) => {
                field.push(character);
                TokenizerState::InUnquoted
            }
            (TokenizerState::InUnquoted, ',') => {
                fields.push(std::mem::take(&mut field));
                TokenizerState::FieldStart
            }
            (TokenizerState::InUnquoted, character) => {
                field.push(character);
                TokenizerState::InUnquoted
            }
            (TokenizerState::InQuoted, '"') => TokenizerState::AfterQuote,
            (TokenizerState::InQuoted, character) => {
                field.push(character);
                TokenizerState::InQuoted
            }
            // An escaped "" inside a quoted field.
            (TokenizerState::AfterQuote, '"') => {
                field.push('"');
                TokenizerState::InQuoted
            }
            (TokenizerState::AfterQuote, ',') => {
                fields.push(std::mem::take(&mut field));
                TokenizerState::FieldStart
            }
            (TokenizerState::AfterQuote, _) => return Ok(None),
        };
    }

    match state {
        TokenizerState::InQuoted => Err(Error::InvalidCsv(format!(
            "unterminated quoted field in line {line:?}"
        ))),
        // A line ending at a field boundary still closes one final, possibly
        // empty, field: "a,b," has three fields.
        TokenizerState::FieldStart
        | TokenizerState::InUnquoted
        | TokenizerState::AfterQuote => {
            fields.push(field);
            Ok(Some(fields))
        }
    }
}

#[cfg(test)]
mod csv_tests {
    use time::macros::date;

    use crate::models::{Transaction, TransactionKind};

    use super::{CSV_HEADER, CsvRecord, parse_csv, to_csv, tokenize_line};

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                id: "a1".to_owned(),
                date: date!(2025 - 03 - 01),
                title: "Salary".to_owned(),
                amount: 2500.0,
                category: "Salary".to_owned(),
                kind: TransactionKind::Income,
            },
            Transaction {
                id: "b2".to_owned(),
                date: date!(2025 - 03 - 02),
                title: "Weekly groceries".to_owned(),
                amount: 82.5,
                category: "Food".to_owned(),
                kind: TransactionKind::Expense,
            },
        ]
    }

    #[test]
    fn export_starts_with_header() {
        let text = to_csv(&sample_transactions());

        assert_eq!(text.lines().next(), Some(CSV_HEADER));
    }

    #[test]
    fn export_writes_one_line_per_transaction_in_order() {
        let text = to_csv(&sample_transactions());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                CSV_HEADER,
                "a1,2025-03-01,\"Salary\",2500,Salary,income",
                "b2,2025-03-02,\"Weekly groceries\",82.5,Food,expense",
            ]
        );
    }

    #[test]
    fn export_doubles_quotes_in_titles() {
        let mut transactions = sample_transactions();
        transactions[0].title = "He said \"hi\", ok".to_owned();

        let text = to_csv(&transactions);

        assert!(
            text.contains("\"He said \"\"hi\"\", ok\""),
            "want doubled quotes in {text}"
        );
    }

    #[test]
    fn quoted_title_round_trips_through_parse() {
        let mut transactions = sample_transactions();
        transactions[0].title = "He said \"hi\", ok".to_owned();

        let records = parse_csv(&to_csv(&transactions)).unwrap();

        assert_eq!(records[0].title, "He said \"hi\", ok");
    }

    #[test]
    fn parse_skips_header_and_blank_lines() {
        let text = format!("{CSV_HEADER}\n\na1,2025-03-01,\"Salary\",2500,Salary,income\n\n");

        let records = parse_csv(&text).unwrap();

        assert_eq!(records.len(), 1, "want 1 record, got {}", records.len());
        assert_eq!(records[0].id, "a1");
    }

    #[test]
    fn parse_skips_rows_with_too_few_fields() {
        let text = format!(
            "{CSV_HEADER}\n\
            a1,2025-03-01,\"Salary\",2500\n\
            b2,2025-03-02,\"Weekly groceries\",82.5,Food,expense"
        );

        let records = parse_csv(&text).unwrap();

        assert_eq!(records.len(), 1, "want 1 record, got {}", records.len());
        assert_eq!(records[0].id, "b2");
    }

    #[test]
    fn parse_generates_id_for_empty_id_field() {
        let text = format!("{CSV_HEADER}\n,2025-03-01,\"Salary\",2500,Salary,income");

        let records = parse_csv(&text).unwrap();

        assert!(!records[0].id.is_empty());
    }

    #[test]
    fn parse_keeps_date_and_kind_verbatim() {
        let text = format!("{CSV_HEADER}\na1,someday,\"Salary\",2500,Salary,revenue");

        let records = parse_csv(&text).unwrap();

        assert_eq!(records[0].date, "someday");
        assert_eq!(records[0].kind, "revenue");
    }

    #[test]
    fn parse_turns_bad_amount_into_nan() {
        let text = format!("{CSV_HEADER}\na1,2025-03-01,\"Salary\",lots,Salary,income");

        let records = parse_csv(&text).unwrap();

        assert!(records[0].amount.is_nan());
    }

    #[test]
    fn parse_fails_on_unterminated_quote() {
        let text = format!("{CSV_HEADER}\na1,2025-03-01,\"Salary,2500,Salary,income");

        let result = parse_csv(&text);

        assert!(
            matches!(result, Err(crate::Error::InvalidCsv(_))),
            "want InvalidCsv, got {result:?}"
        );
    }

    #[test]
    fn parse_skips_row_with_text_after_closing_quote() {
        let text = format!(
            "{CSV_HEADER}\n\
            a1,2025-03-01,\"Salary\"oops,2500,Salary,income\n\
            b2,2025-03-02,\"Weekly groceries\",82.5,Food,expense"
        );

        let records = parse_csv(&text).unwrap();

        assert_eq!(records.len(), 1, "want 1 record, got {}", records.len());
        assert_eq!(records[0].id, "b2");
    }

    #[test]
    fn parse_ignores_fields_beyond_the_sixth() {
        let text = format!("{CSV_HEADER}\na1,2025-03-01,\"Salary\",2500,Salary,income,extra");

        let records = parse_csv(&text).unwrap();

        assert_eq!(records[0].kind, "income");
    }

    #[test]
    fn tokenize_keeps_trailing_empty_field() {
        let fields = tokenize_line("a,b,").unwrap().unwrap();

        assert_eq!(fields, vec!["a", "b", ""]);
    }

    #[test]
    fn tokenize_handles_commas_inside_quotes() {
        let fields = tokenize_line("a,\"b, c\",d").unwrap().unwrap();

        assert_eq!(fields, vec!["a", "b, c", "d"]);
    }

    #[test]
    fn tokenize_unescapes_doubled_quotes() {
        let fields = tokenize_line("\"He said \"\"hi\"\"\"").unwrap().unwrap();

        assert_eq!(fields, vec!["He said \"hi\""]);
    }

    #[test]
    fn candidate_converts_to_transaction() {
        let record = CsvRecord {
            id: "a1".to_owned(),
            date: "2025-03-01".to_owned(),
            title: "Salary".to_owned(),
            amount: 2500.0,
            category: "Salary".to_owned(),
            kind: "income".to_owned(),
        };

        let transaction = Transaction::try_from(record).unwrap();

        assert_eq!(transaction.date, date!(2025 - 03 - 01));
        assert_eq!(transaction.kind, TransactionKind::Income);
    }

    #[test]
    fn candidate_with_bad_date_fails_conversion() {
        let record = CsvRecord {
            id: "a1".to_owned(),
            date: "someday".to_owned(),
            title: "Salary".to_owned(),
            amount: 2500.0,
            category: "Salary".to_owned(),
            kind: "income".to_owned(),
        };

        assert_eq!(
            Transaction::try_from(record),
            Err(crate::Error::InvalidDate("someday".to_owned()))
        );
    }

    #[test]
    fn candidate_with_nan_amount_fails_conversion() {
        let record = CsvRecord {
            id: "a1".to_owned(),
            date: "2025-03-01".to_owned(),
            title: "Salary".to_owned(),
            amount: f64::NAN,
            category: "Salary".to_owned(),
            kind: "income".to_owned(),
        };

        assert!(matches!(
            Transaction::try_from(record),
            Err(crate::Error::NonPositiveAmount(_))
        ));
    }
}
