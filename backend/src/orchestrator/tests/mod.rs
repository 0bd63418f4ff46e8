mod test_invariants;
