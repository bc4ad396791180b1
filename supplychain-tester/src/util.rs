pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::split_csv;

    #[test]
    fn split_csv_trims_and_drops_empty() {
        assert_eq!(split_csv(" steady, ,budget,"), vec!["steady", "budget"]);
        assert!(split_csv("").is_empty());
    }
}
