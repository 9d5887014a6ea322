pub mod debit;
