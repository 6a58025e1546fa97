table! {
    mediawiki_site (id) {
        id -> Integer,
        name -> Text,
        api -> Text,
        article_path -> Text,
        username -> Nullable<Text>,
        password -> Nullable<Text>,
    }
}

table! {
    channel (id) {
        id -> Integer,
        name -> Text,
        enabled -> Bool,
        silenced -> Bool,
        autolink -> Bool,
        long_user_info -> Bool,
        base_wiki_id -> Nullable<Integer>,
    }
}

table! {
    flag_group (id) {
        id -> Integer,
        name -> Text,
        protected -> Bool,
        deny -> Bool,
        flags -> Text,
    }
}

table! {
    flag_group_user (id) {
        id -> Integer,
        group_id -> Integer,
        nickname -> Text,
        username -> Text,
        hostname -> Text,
        account -> Text,
        protected -> Bool,
    }
}

table! {
    flag_group_channel (id) {
        id -> Integer,
        group_id -> Integer,
        channel_id -> Integer,
        protected -> Bool,
    }
}

table! {
    category_watcher (id) {
        id -> Integer,
        channel_id -> Integer,
        site_id -> Integer,
        keyword -> Text,
        category -> Text,
        sleep_time -> Integer,
        enabled -> Bool,
        show_link -> Bool,
        show_short_url -> Bool,
        show_wait_time -> Bool,
        delta -> Bool,
        singular -> Text,
        plural -> Text,
        action -> Text,
        min_wait_time -> Integer,
        priority -> Integer,
    }
}

table! {
    category_watcher_item (id) {
        id -> Integer,
        watcher_id -> Integer,
        title -> Text,
        touched -> Timestamp,
    }
}

table! {
    command_alias (id) {
        id -> Integer,
        channel_id -> Nullable<Integer>,
        invocation -> Text,
        target -> Nullable<Text>,
    }
}

table! {
    keyword (id) {
        id -> Integer,
        name -> Text,
        response -> Text,
        action -> Bool,
    }
}

table! {
    ignored_page (id) {
        id -> Integer,
        title -> Text,
    }
}
