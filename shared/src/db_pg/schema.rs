table! {
  #[sql_name = "user"]
  users (id) {
    id -> Int4,
    email -> Text,
  }
}

table! {
  miner_account (id) {
    id -> Int4,
    name -> Text,
    main_user_id -> Int4,
  }
}

table! {
  machine (id) {
    id -> Int4,
    miner_account_id -> Int4,
    created_at -> Nullable<Timestamptz>,
    name -> Nullable<Text>,
    project -> Nullable<Text>,
    last_commit_solution -> Nullable<Int8>,
  }
}

table! {
  distributor (id) {
    id -> Int4,
    miner_account_id -> Int4,
    created_at -> Nullable<Timestamptz>,
    reward -> Nullable<Numeric>,
    pay_status -> Nullable<Text>,
    status -> Nullable<Text>,
  }
}

joinable!(machine -> miner_account (miner_account_id));
joinable!(distributor -> miner_account (miner_account_id));
joinable!(miner_account -> users (main_user_id));

allow_tables_to_appear_in_same_query!(users, miner_account, machine, distributor);
