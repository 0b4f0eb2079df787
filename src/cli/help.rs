//! Help text generation and utilities

/// Text shown after the flag list in `--help`
pub const AFTER_HELP: &str = "\
EXAMPLES:

  boilr -e 'var=World' 'Hello, ${var}!'
  echo 'Hello ${var,,}' | boilr -e 'var=world'
  boilr -s /path/to/my-vars.env -f /path/to/my-template-file.txt
  boilr -e var=val -o ../my-output-dir -d /path/to/my-template-dir

SUPPORTED FUNCTIONS:

  ${var}                        Value of `$var`
  ${#var}                       String length of `$var`
  ${var^}                       Uppercase first character of `$var`
  ${var^^}                      Uppercase all characters in `$var`
  ${var,}                       Lowercase first character of `$var`
  ${var,,}                      Lowercase all characters in `$var`
  ${var:n}                      Offset `$var` `n` characters from start
  ${var:n:len}                  Offset `$var` `n` characters with max length of `len`
  ${var#pattern}                Strip shortest `pattern` match from start
  ${var##pattern}               Strip longest `pattern` match from start
  ${var*pattern}                Strip shortest `pattern` match from end
  ${var**pattern}               Strip longest `pattern` match from end
  ${var-default}                If `$var` is not set, evaluate expression as `default`
  ${var:-default}               If `$var` is not set or is empty, evaluate expression as `default`
  ${var=default}                As `${var-default}`, and assign `default` to `$var`
  ${var:=default}               As `${var:-default}`, and assign `default` to `$var`
  ${var/pattern/replacement}    Replace the first `pattern` match with `replacement`
  ${var//pattern/replacement}   Replace every `pattern` match with `replacement`
  ${var/#pattern/replacement}   Replace `pattern` match with `replacement` from `$var` start
  ${var/*pattern/replacement}   Replace `pattern` match with `replacement` from `$var` end";

/// Get the log level description based on verbosity
pub fn get_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::Cli;
    use clap::CommandFactory;

    #[test]
    fn test_help_lists_every_form() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("SUPPORTED FUNCTIONS:"));
        for form in [
            "${var}", "${#var}", "${var^}", "${var^^}", "${var,}", "${var,,}", "${var:n}",
            "${var:n:len}", "${var#pattern}", "${var##pattern}", "${var*pattern}",
            "${var**pattern}", "${var-default}", "${var:-default}", "${var=default}",
            "${var:=default}", "${var/pattern/replacement}", "${var//pattern/replacement}",
            "${var/#pattern/replacement}", "${var/*pattern/replacement}",
        ] {
            assert!(help.contains(form), "missing {form}");
        }
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(get_log_level(0), "warn");
        assert_eq!(get_log_level(1), "debug");
        assert_eq!(get_log_level(2), "trace");
        assert_eq!(get_log_level(9), "trace");
    }
}
