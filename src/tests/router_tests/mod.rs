mod decision_tests;
mod ledger_tests;
mod page_tests;
mod webhook_tests;
