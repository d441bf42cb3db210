mod stop_forum_spam_tests;
