mod test_outcome_reaches_joiner_only;
