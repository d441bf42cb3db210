mod verification_policy_tests;
